//! HTTP request plumbing.
//!
//! [`RequestSpec`] describes a call, a [`Transport`] puts it on the wire and
//! the [`RequestDispatcher`] decides what the response means, recovering from
//! one rejected auth header per call.

mod dispatch;
mod request;
mod transport;

pub use dispatch::{Reauthenticate, RequestDispatcher};
pub use request::{HttpMethod, RequestSpec};
pub use transport::{ApiResponse, ReqwestTransport, Transport};
