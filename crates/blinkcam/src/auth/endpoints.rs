//! Login request/response wire types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `Host` header value the login endpoint expects.
pub const LOGIN_HOST: &str = "prod.immedia-semi.com";

/// Request body for the login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub client_specifier: &'a str,
}

/// Response from the login endpoint.
///
/// Both fields are optional here so a response missing one can be reported
/// precisely instead of as a generic decode failure.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub region: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub authtoken: Option<AuthTokenBody>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The `authtoken` object of a login response.
#[derive(Debug, Deserialize)]
pub struct AuthTokenBody {
    #[serde(default)]
    pub authtoken: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_request_field_names() {
        let body = serde_json::to_value(LoginRequest {
            email: "foobar",
            password: "deadbeef",
            client_specifier: "iPhone 9.2 | 2.2 | 222",
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "email": "foobar",
                "password": "deadbeef",
                "client_specifier": "iPhone 9.2 | 2.2 | 222"
            })
        );
    }

    #[test]
    fn login_response_tolerates_missing_fields() {
        let response: LoginResponse =
            serde_json::from_value(json!({"authtoken": {"authtoken": "foobarbaz"}})).unwrap();
        assert!(response.region.is_none());
        assert_eq!(
            response.authtoken.and_then(|t| t.authtoken).as_deref(),
            Some("foobarbaz")
        );
    }
}
