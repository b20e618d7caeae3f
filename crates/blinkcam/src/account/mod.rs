//! Account authentication primitives.
//!
//! This module provides the credential, auth header and prompt types used
//! when logging in to the Blink service.

mod credentials;
mod prompt;
mod tokens;

pub use credentials::Credentials;
pub use prompt::{CredentialPrompt, TerminalPrompt};
pub use tokens::{AUTH_TOKEN_HEADER, AuthHeader};
