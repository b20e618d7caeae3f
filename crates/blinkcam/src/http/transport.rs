//! HTTP transport.

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{instrument, trace};

use crate::config::BlinkConfig;
use crate::error::{Error, ProtocolError, TransportError};

use super::request::RequestSpec;

/// A completed HTTP exchange: status code and decoded JSON body.
///
/// An empty body decodes to `null`. A non-JSON body on an error status is kept
/// as a JSON string so the status can still be classified.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    status: u16,
    body: serde_json::Value,
}

impl ApiResponse {
    /// Create a response.
    pub fn new(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    /// Returns the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the JSON body.
    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }

    /// Consume the response, returning the JSON body.
    pub fn into_body(self) -> serde_json::Value {
        self.body
    }

    /// Deserialize the body into a typed value.
    ///
    /// # Errors
    ///
    /// Returns a protocol error if the body does not have the expected shape.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        T::deserialize(&self.body).map_err(|e| {
            ProtocolError::new(self.status, Some(format!("unexpected response: {e}"))).into()
        })
    }
}

/// Sends requests to the service.
///
/// The transport reports what happened on the wire and nothing more: status
/// codes are returned as responses, never turned into errors. Deciding what a
/// status means belongs to the dispatcher.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send one request and return the response.
    async fn send(&self, request: &RequestSpec) -> Result<ApiResponse, TransportError>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the user agent and timeout from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built (e.g. TLS backend
    /// initialization failure).
    pub fn new(config: &BlinkConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.timeout())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    async fn send(&self, request: &RequestSpec) -> Result<ApiResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method().to_reqwest(), request.url())
            .headers(request.headers().clone());
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        trace!(status = %status, "HTTP response");

        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(_) if !status.is_success() => {
                    serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
                }
                Err(e) => {
                    return Err(TransportError::Decode {
                        message: e.to_string(),
                    });
                }
            }
        };

        Ok(ApiResponse::new(status.as_u16(), body))
    }
}
