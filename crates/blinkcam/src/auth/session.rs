//! The login protocol.

use std::sync::Arc;

use reqwest::header::{HOST, HeaderValue};
use tracing::{debug, info, instrument};

use crate::Result;
use crate::account::{AuthHeader, CredentialPrompt, Credentials};
use crate::config::BlinkConfig;
use crate::error::AuthError;
use crate::http::{RequestSpec, Transport};
use crate::types::{RegionInfo, UrlHandler};

use super::endpoints::{LOGIN_HOST, LoginRequest, LoginResponse};

/// Everything a successful login yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Header to attach to authenticated requests.
    pub header: AuthHeader,
    /// Region serving the account.
    pub region: RegionInfo,
    /// Endpoints for that region.
    pub urls: UrlHandler,
}

/// Performs the login exchange against the service.
///
/// Login requests go straight to the transport: a rejected login is final and
/// never re-authenticated.
#[derive(Debug, Clone)]
pub struct AuthSession {
    transport: Arc<dyn Transport>,
    config: BlinkConfig,
}

impl AuthSession {
    /// Create a session over a transport.
    pub fn new(transport: Arc<dyn Transport>, config: BlinkConfig) -> Self {
        Self { transport, config }
    }

    /// Log in with the given credentials.
    ///
    /// Nothing is sent unless both username and password are present.
    ///
    /// # Errors
    ///
    /// Every failure is an [`AuthError`]: missing credentials, an unreachable
    /// endpoint, a rejected login, or a response without region or token.
    #[instrument(skip(self, credentials), fields(username = ?credentials.username()))]
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<LoginOutcome> {
        let (username, password) = credentials.require()?;
        info!("Logging in");

        let body = serde_json::to_value(LoginRequest {
            email: username,
            password,
            client_specifier: self.config.client_specifier(),
        })
        .map_err(|e| AuthError::Unreachable {
            message: e.to_string(),
        })?;

        let request = RequestSpec::post(self.config.login_url()?)
            .header(HOST, HeaderValue::from_static(LOGIN_HOST))
            .json(body);

        let response = self
            .transport
            .send(&request)
            .await
            .map_err(|e| AuthError::Unreachable {
                message: e.to_string(),
            })?;

        if !response.is_success() {
            let message = response
                .body()
                .get("message")
                .and_then(|m| m.as_str())
                .or_else(|| response.body().as_str())
                .unwrap_or("no message")
                .to_string();
            return Err(AuthError::LoginRejected {
                status: response.status(),
                message,
            }
            .into());
        }

        let login: LoginResponse = response.json().map_err(|e| malformed(e.to_string()))?;
        self.outcome_from(login)
    }

    /// Prompt for whichever credentials are missing, then log in.
    ///
    /// Prompted values are stored into `credentials` before the login is
    /// attempted, so they are kept even if the login fails.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Prompt`] if reading input fails,
    /// [`AuthError::MissingCredential`] for an empty answer, and any error
    /// from [`authenticate`](Self::authenticate).
    #[instrument(skip_all)]
    pub async fn interactive_login(
        &self,
        credentials: &mut Credentials,
        prompt: &dyn CredentialPrompt,
    ) -> Result<LoginOutcome> {
        if !credentials.has_username() {
            let username = read_answer(prompt.username(), "username")?;
            credentials.set_username(username);
        }
        if !credentials.has_password() {
            let password = read_answer(prompt.password(), "password")?;
            credentials.set_password(password);
        }

        debug!("Credentials complete");
        self.authenticate(credentials).await
    }

    fn outcome_from(&self, login: LoginResponse) -> Result<LoginOutcome> {
        let region = login
            .region
            .as_ref()
            .and_then(RegionInfo::from_login_map)
            .ok_or_else(|| malformed(missing_reason("region", login.message.as_deref())))?;

        let token = login
            .authtoken
            .and_then(|t| t.authtoken)
            .ok_or_else(|| malformed(missing_reason("authtoken", login.message.as_deref())))?;

        let urls = self
            .config
            .urls_for(region.id())
            .map_err(|e| malformed(e.to_string()))?;
        let header = AuthHeader::new(urls.host(), token);

        info!(region = %region, host = header.host(), "Logged in");
        Ok(LoginOutcome {
            header,
            region,
            urls,
        })
    }
}

fn read_answer(answer: std::io::Result<String>, field: &'static str) -> Result<String> {
    let value = answer.map_err(|e| AuthError::Prompt {
        message: e.to_string(),
    })?;
    if value.is_empty() {
        return Err(AuthError::MissingCredential { field }.into());
    }
    Ok(value)
}

fn malformed(reason: String) -> AuthError {
    AuthError::MalformedLoginResponse { reason }
}

fn missing_reason(field: &str, message: Option<&str>) -> String {
    match message {
        Some(message) => format!("missing {field} ({message})"),
        None => format!("missing {field}"),
    }
}
