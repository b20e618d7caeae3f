//! Error types for the blinkcam library.
//!
//! Failures fall into two classes. [`Error::Auth`] covers everything that
//! means "the service does not accept who we claim to be": missing
//! credentials, a rejected login, or a header rejected again after the one
//! permitted re-authentication. Every other variant is a generic failure
//! (malformed request, transport trouble, unexpected responses).

use std::fmt;
use thiserror::Error;

/// The unified error type for blinkcam operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Authentication errors (missing credentials, rejected login or header).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Request construction errors, raised before anything is sent.
    #[error("request error: {0}")]
    Request(#[from] RequestError),

    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Protocol errors (unexpected status or response shape).
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl Error {
    /// Returns true if this error belongs to the authentication class.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Auth(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A credential needed for login is absent.
    #[error("missing {field}")]
    MissingCredential { field: &'static str },

    /// The login endpoint refused the credentials.
    #[error("login rejected with HTTP {status}: {message}")]
    LoginRejected { status: u16, message: String },

    /// The login response lacked the region or token.
    #[error("malformed login response: {reason}")]
    MalformedLoginResponse { reason: String },

    /// The login endpoint could not be reached.
    #[error("login endpoint unreachable: {message}")]
    Unreachable { message: String },

    /// The service rejected the auth header on a replayed request.
    #[error("auth header rejected (HTTP {status}){}", rejection_detail(.code, .message))]
    Rejected {
        status: u16,
        code: Option<i64>,
        message: Option<String>,
    },

    /// Reading credentials from the prompt failed.
    #[error("credential prompt failed: {message}")]
    Prompt { message: String },
}

fn rejection_detail(code: &Option<i64>, message: &Option<String>) -> String {
    match (code, message) {
        (Some(code), Some(message)) => format!(" [{code}]: {message}"),
        (Some(code), None) => format!(" [{code}]"),
        (None, Some(message)) => format!(": {message}"),
        (None, None) => String::new(),
    }
}

/// Errors in building a request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request method is not one of get, post or put.
    #[error("unsupported request method '{method}'")]
    UnsupportedMethod { method: String },

    /// An authenticated call was attempted before any login.
    #[error("no auth header, login first")]
    NoAuthHeader,

    /// The account region was never resolved, so no API host is known.
    #[error("region not resolved, login first")]
    RegionUnresolved,

    /// A header value contained characters HTTP does not allow.
    #[error("invalid header value for '{name}'")]
    InvalidHeader { name: &'static str },

    /// An endpoint URL could not be built.
    #[error("invalid URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// The response body was not valid JSON.
    #[error("could not decode response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout {
                message: err.to_string(),
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else if err.is_decode() {
            TransportError::Decode {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

/// Protocol-level errors from API responses.
#[derive(Debug)]
pub struct ProtocolError {
    /// HTTP status code.
    pub status: u16,
    /// Error message from the server, or a description of what was missing.
    pub message: Option<String>,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ProtocolError {}

impl ProtocolError {
    /// Create a new protocol error.
    pub fn new(status: u16, message: Option<String>) -> Self {
        Self { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_class_is_distinguished() {
        let auth: Error = AuthError::MissingCredential { field: "username" }.into();
        let request: Error = RequestError::NoAuthHeader.into();
        assert!(auth.is_auth_error());
        assert!(!request.is_auth_error());
    }

    #[test]
    fn rejection_message_includes_service_detail() {
        let err = AuthError::Rejected {
            status: 401,
            code: Some(101),
            message: Some("Unauthorized Access".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "auth header rejected (HTTP 401) [101]: Unauthorized Access"
        );
    }

    #[test]
    fn protocol_error_display() {
        let err = ProtocolError::new(503, Some("maintenance".to_string()));
        assert_eq!(err.to_string(), "HTTP 503: maintenance");
        assert_eq!(ProtocolError::new(500, None).to_string(), "HTTP 500");
    }
}
