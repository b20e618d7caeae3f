//! Request description types.

use std::fmt;
use std::str::FromStr;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::account::AuthHeader;
use crate::error::RequestError;

/// The request methods the Blink API is called with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    /// Returns the lowercase method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            _ => Err(RequestError::UnsupportedMethod {
                method: s.to_string(),
            }),
        }
    }
}

/// A single API call: method, URL, headers, optional JSON body, and whether
/// this is already the replay after a re-authentication.
#[derive(Clone, Debug)]
pub struct RequestSpec {
    method: HttpMethod,
    url: String,
    headers: HeaderMap,
    body: Option<serde_json::Value>,
    is_retry: bool,
}

impl RequestSpec {
    /// Create a request with no headers or body.
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
            is_retry: false,
        }
    }

    /// Create a request from a method name.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::UnsupportedMethod`] unless the method is one of
    /// `get`, `post` or `put`.
    pub fn parse(method: &str, url: impl Into<String>) -> Result<Self, RequestError> {
        Ok(Self::new(method.parse()?, url))
    }

    /// Create a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Create a POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// Create a PUT request.
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    /// Set a JSON body.
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attach an auth header, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the host or token is not a valid header value.
    pub fn with_auth(mut self, auth: &AuthHeader) -> Result<Self, RequestError> {
        auth.apply(&mut self.headers)?;
        Ok(self)
    }

    /// Mark whether this request is a replay. A replay that is rejected is
    /// not re-authenticated again.
    pub fn retry(mut self, is_retry: bool) -> Self {
        self.is_retry = is_retry;
        self
    }

    /// Turn a rejected request into its replay carrying a fresh header.
    pub(crate) fn into_retry(self, auth: &AuthHeader) -> Result<Self, RequestError> {
        Ok(self.with_auth(auth)?.retry(true))
    }

    /// Returns the method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the JSON body, if any.
    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// Returns true if this request is a replay.
    pub fn is_retry(&self) -> bool {
        self.is_retry
    }
}
