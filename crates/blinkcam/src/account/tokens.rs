//! Auth header type for authenticated Blink requests.

use std::fmt;

use reqwest::header::{HOST, HeaderMap, HeaderName, HeaderValue};

use crate::error::RequestError;

/// Wire name of the header carrying the auth token.
pub const AUTH_TOKEN_HEADER: &str = "TOKEN_AUTH";

/// The credential attached to every authenticated request.
///
/// Produced by a successful login. On the wire it becomes two headers:
/// `Host: <host>` and `TOKEN_AUTH: <token>`. Headers are compared by value.
///
/// # Security
///
/// The token is never shown in Debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader {
    host: String,
    token: String,
}

impl AuthHeader {
    /// Create a header from a host and token.
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: token.into(),
        }
    }

    /// Returns the API host this header is bound to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the token value.
    ///
    /// # Security
    ///
    /// Use only when constructing requests or comparing headers.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Write this header's `Host` and `TOKEN_AUTH` entries into `headers`,
    /// overwriting any previous values.
    pub(crate) fn apply(&self, headers: &mut HeaderMap) -> Result<(), RequestError> {
        let host = HeaderValue::from_str(&self.host)
            .map_err(|_| RequestError::InvalidHeader { name: "Host" })?;
        let mut token = HeaderValue::from_str(&self.token).map_err(|_| {
            RequestError::InvalidHeader {
                name: AUTH_TOKEN_HEADER,
            }
        })?;
        token.set_sensitive(true);

        headers.insert(HOST, host);
        headers.insert(token_header_name(), token);
        Ok(())
    }
}

fn token_header_name() -> HeaderName {
    // HeaderName stores names lowercased; HTTP header names are case-insensitive.
    HeaderName::from_static("token_auth")
}

impl fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthHeader")
            .field("host", &self.host)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_header_hides_token_in_debug() {
        let header = AuthHeader::new("prde.immedia-semi.com", "foobarbaz");
        let debug = format!("{:?}", header);
        assert!(debug.contains("prde.immedia-semi.com"));
        assert!(!debug.contains("foobarbaz"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn apply_overwrites_previous_token() {
        let mut headers = HeaderMap::new();
        AuthHeader::new("prde.immedia-semi.com", "BADTOKEN")
            .apply(&mut headers)
            .unwrap();
        AuthHeader::new("prde.immedia-semi.com", "foobarbaz")
            .apply(&mut headers)
            .unwrap();

        assert_eq!(headers.get(AUTH_TOKEN_HEADER).unwrap(), "foobarbaz");
        assert_eq!(headers.get("host").unwrap(), "prde.immedia-semi.com");
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn apply_rejects_control_characters() {
        let mut headers = HeaderMap::new();
        let result = AuthHeader::new("prde.immedia-semi.com", "bad\ntoken").apply(&mut headers);
        assert!(matches!(
            result,
            Err(RequestError::InvalidHeader { name: AUTH_TOKEN_HEADER })
        ));
    }
}
