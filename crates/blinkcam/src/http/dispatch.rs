//! Authenticated request dispatch with a single re-authentication.
//!
//! Every call runs through a small state machine:
//!
//! ```text
//! Sending ──success──────────────────────────────▶ Ok(response)
//!    │ ──other failure───────────────────────────▶ Err(Protocol/Transport)
//!    │ ──auth rejected, is_retry──────────────────▶ Err(Auth::Rejected)
//!    └ ──auth rejected, first attempt─▶ Reauthenticating ─▶ Sending (is_retry)
//! ```
//!
//! Only a replay can reach the terminal auth rejection, so at most one
//! re-authentication happens per call.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::account::AuthHeader;
use crate::error::{AuthError, ProtocolError};

use super::request::RequestSpec;
use super::transport::{ApiResponse, Transport};

/// Produces a fresh auth header after the service rejected the current one.
#[async_trait]
pub trait Reauthenticate: Send + Sync {
    /// Discard the rejected header and log in again.
    async fn reauthenticate(&self) -> Result<AuthHeader>;
}

/// Why the service refused a header.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Rejection {
    status: u16,
    code: Option<i64>,
    message: Option<String>,
}

impl From<Rejection> for AuthError {
    fn from(rejection: Rejection) -> Self {
        AuthError::Rejected {
            status: rejection.status,
            code: rejection.code,
            message: rejection.message,
        }
    }
}

/// How a completed exchange is interpreted.
#[derive(Debug, PartialEq)]
pub(crate) enum Outcome {
    Success(ApiResponse),
    AuthRejected(Rejection),
    Failed(u16, Option<String>),
}

/// Classify a response.
///
/// A 401 is an auth rejection. So is a 2xx whose body is the service's
/// error envelope (`{"code": .., "message": ..}`), which the API returns for
/// expired tokens on some endpoints. Any other non-2xx status is a plain
/// failure and is never retried.
pub(crate) fn classify(response: ApiResponse) -> Outcome {
    let envelope = error_envelope(response.body());

    if response.status() == 401 {
        let (code, message) = envelope.unwrap_or((None, None));
        return Outcome::AuthRejected(Rejection {
            status: 401,
            code,
            message,
        });
    }

    if response.is_success() {
        return match envelope {
            Some((code, message)) => Outcome::AuthRejected(Rejection {
                status: response.status(),
                code,
                message,
            }),
            None => Outcome::Success(response),
        };
    }

    let message = envelope
        .and_then(|(_, message)| message)
        .or_else(|| response.body().as_str().map(str::to_string));
    Outcome::Failed(response.status(), message)
}

fn error_envelope(body: &serde_json::Value) -> Option<(Option<i64>, Option<String>)> {
    let object = body.as_object()?;
    let code = object.get("code")?.as_i64()?;
    let message = object
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string);
    Some((Some(code), message))
}

enum DispatchState {
    Sending(RequestSpec),
    Reauthenticating(RequestSpec),
}

/// Sends requests and recovers from a rejected auth header exactly once.
#[derive(Debug, Clone)]
pub struct RequestDispatcher {
    transport: Arc<dyn Transport>,
}

impl RequestDispatcher {
    /// Create a dispatcher over a transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Send a request, re-authenticating and replaying once if the service
    /// rejects its auth header.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Rejected`] if a replay (`is_retry`) is rejected
    /// - any error from `reauth` while obtaining a new header
    /// - a transport or protocol error for every other failure, without retry
    #[instrument(
        skip(self, request, reauth),
        fields(method = %request.method(), url = %request.url(), is_retry = request.is_retry())
    )]
    pub async fn dispatch(
        &self,
        request: RequestSpec,
        reauth: &dyn Reauthenticate,
    ) -> Result<ApiResponse> {
        let mut state = DispatchState::Sending(request);

        loop {
            state = match state {
                DispatchState::Sending(request) => {
                    debug!(is_retry = request.is_retry(), "Sending request");
                    let response = self.transport.send(&request).await?;

                    match classify(response) {
                        Outcome::Success(response) => return Ok(response),
                        Outcome::Failed(status, message) => {
                            return Err(ProtocolError::new(status, message).into());
                        }
                        Outcome::AuthRejected(rejection) if request.is_retry() => {
                            warn!(status = rejection.status, "Auth header rejected on replay");
                            return Err(AuthError::from(rejection).into());
                        }
                        Outcome::AuthRejected(rejection) => {
                            warn!(status = rejection.status, "Auth header rejected");
                            DispatchState::Reauthenticating(request)
                        }
                    }
                }
                DispatchState::Reauthenticating(request) => {
                    info!("Re-authenticating before replay");
                    let header = reauth.reauthenticate().await?;
                    DispatchState::Sending(request.into_retry(&header)?)
                }
            };
        }
    }
}
