//! Authentication against the Blink login endpoint.
//!
//! [`AuthSession`] turns credentials into an [`AuthHeader`](crate::AuthHeader)
//! plus the account's region. It is kept apart from request dispatch so a
//! re-authentication can be triggered the same way whichever call failed.

mod endpoints;
mod session;

pub use session::{AuthSession, LoginOutcome};
