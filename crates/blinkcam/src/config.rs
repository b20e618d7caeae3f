//! Client configuration.
//!
//! [`BlinkConfig`] collects the knobs that do not depend on the account:
//! where the API lives, how the client identifies itself and how long to
//! wait for the service. It deserializes with serde (every field optional)
//! so callers can load it from whatever configuration source they use.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use blinkcam::BlinkConfig;
//!
//! let config = BlinkConfig::builder()
//!     .api_base_template("http://127.0.0.1:8080")
//!     .timeout(Duration::from_secs(5))
//!     .build();
//!
//! assert_eq!(config.login_url().unwrap(), "http://127.0.0.1:8080/login");
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::Result;
use crate::types::{DEFAULT_API_BASE_TEMPLATE, LOGIN_REGION, UrlHandler};

/// Identifier the service expects in every login request.
pub const DEFAULT_CLIENT_SPECIFIER: &str = "iPhone 9.2 | 2.2 | 222";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for a [`Blink`](crate::Blink) client.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    api_base_template: String,
    login_url: Option<String>,
    client_specifier: String,
    user_agent: String,
    timeout_secs: u64,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            api_base_template: DEFAULT_API_BASE_TEMPLATE.to_string(),
            login_url: None,
            client_specifier: DEFAULT_CLIENT_SPECIFIER.to_string(),
            user_agent: concat!("blinkcam/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl BlinkConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> BlinkConfigBuilder {
        BlinkConfigBuilder::default()
    }

    /// Returns the API base URL template (`{region}` is the placeholder).
    pub fn api_base_template(&self) -> &str {
        &self.api_base_template
    }

    /// Returns the login endpoint.
    ///
    /// Unless overridden, this is the `login` endpoint of the `prod` region
    /// under the API base template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template does not produce a valid URL.
    pub fn login_url(&self) -> Result<String> {
        match &self.login_url {
            Some(url) => Ok(url.clone()),
            None => Ok(self.urls_for(LOGIN_REGION)?.login_url()),
        }
    }

    /// Returns the endpoints for a region under the API base template.
    ///
    /// # Errors
    ///
    /// Returns an error if the region id or template is invalid.
    pub fn urls_for(&self, region_id: &str) -> Result<UrlHandler> {
        UrlHandler::from_template(&self.api_base_template, region_id)
    }

    /// Returns the client identifier sent with the login request.
    pub fn client_specifier(&self) -> &str {
        &self.client_specifier
    }

    /// Returns the HTTP user agent.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Builder for [`BlinkConfig`].
#[derive(Debug, Default)]
pub struct BlinkConfigBuilder {
    config: BlinkConfig,
}

impl BlinkConfigBuilder {
    /// Set the API base URL template.
    pub fn api_base_template(mut self, template: impl Into<String>) -> Self {
        self.config.api_base_template = template.into();
        self
    }

    /// Override the login endpoint.
    pub fn login_url(mut self, url: impl Into<String>) -> Self {
        self.config.login_url = Some(url.into());
        self
    }

    /// Set the client identifier sent with the login request.
    pub fn client_specifier(mut self, specifier: impl Into<String>) -> Self {
        self.config.client_specifier = specifier.into();
        self
    }

    /// Set the HTTP user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout (whole seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = timeout.as_secs();
        self
    }

    /// Finish building.
    pub fn build(self) -> BlinkConfig {
        self.config
    }
}
