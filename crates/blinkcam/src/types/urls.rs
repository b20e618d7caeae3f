//! Region-keyed endpoint lookup.

use std::fmt;

use url::Url;

use crate::error::{Error, RequestError};

/// Domain under which every regional API host lives.
pub const API_DOMAIN: &str = "immedia-semi.com";

/// Base URL template for the regional REST API. `{region}` is replaced by
/// the region id.
pub const DEFAULT_API_BASE_TEMPLATE: &str = "https://rest.{region}.immedia-semi.com";

/// Region used for logging in, before the account region is known.
pub const LOGIN_REGION: &str = "prod";

/// Endpoints for one service region.
///
/// Built from a base URL template and a region id. The template defaults to
/// [`DEFAULT_API_BASE_TEMPLATE`]; a template without a `{region}`
/// placeholder sends every region to the same base, which is how tests and
/// proxies redirect traffic.
///
/// # Example
///
/// ```
/// use blinkcam::UrlHandler;
///
/// let urls = UrlHandler::new("prde").unwrap();
/// assert_eq!(urls.base_url(), "https://rest.prde.immedia-semi.com");
/// assert_eq!(urls.home_url(), "https://rest.prde.immedia-semi.com/homescreen");
/// assert_eq!(urls.host(), "prde.immedia-semi.com");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UrlHandler {
    region_id: String,
    base: Url,
}

impl UrlHandler {
    /// Endpoints for a region on the production service.
    ///
    /// # Errors
    ///
    /// Returns an error if the region id cannot form a host name.
    pub fn new(region_id: impl AsRef<str>) -> Result<Self, Error> {
        Self::from_template(DEFAULT_API_BASE_TEMPLATE, region_id)
    }

    /// Endpoints for a region using a custom base URL template.
    ///
    /// # Errors
    ///
    /// Returns an error if the region id is not a valid host label, or the
    /// resulting URL is not absolute HTTPS (HTTP is allowed for localhost).
    pub fn from_template(template: &str, region_id: impl AsRef<str>) -> Result<Self, Error> {
        let region_id = region_id.as_ref();
        validate_region_id(region_id)?;

        let raw = template.replace("{region}", region_id);
        let base = Url::parse(&raw).map_err(|e| RequestError::InvalidUrl {
            value: raw.clone(),
            reason: e.to_string(),
        })?;
        validate_base(&base, &raw)?;

        Ok(Self {
            region_id: region_id.to_string(),
            base,
        })
    }

    /// Returns the region id these endpoints belong to.
    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    /// Returns the API host name sent in the auth header.
    pub fn host(&self) -> String {
        format!("{}.{}", self.region_id, API_DOMAIN)
    }

    /// Returns the base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Returns the login endpoint.
    pub fn login_url(&self) -> String {
        self.endpoint("login")
    }

    /// Returns the homescreen (account summary) endpoint.
    pub fn home_url(&self) -> String {
        self.endpoint("homescreen")
    }

    /// Returns the endpoint listing every network on the account.
    pub fn networks_url(&self) -> String {
        self.endpoint("networks")
    }

    /// Returns the endpoint for a single network.
    pub fn network_url(&self, network_id: &str) -> String {
        self.endpoint(&format!("network/{network_id}"))
    }

    /// Returns the event endpoint for a network.
    pub fn event_url(&self, network_id: &str) -> String {
        self.endpoint(&format!("events/network/{network_id}"))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path)
    }
}

fn validate_region_id(region_id: &str) -> Result<(), Error> {
    let valid = !region_id.is_empty()
        && region_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(RequestError::InvalidUrl {
            value: region_id.to_string(),
            reason: "region id must be a non-empty host label".to_string(),
        }
        .into())
    }
}

fn validate_base(url: &Url, original: &str) -> Result<(), Error> {
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(RequestError::InvalidUrl {
            value: original.to_string(),
            reason: "must be an absolute URL with a host".to_string(),
        }
        .into());
    }

    // Must be HTTPS (or HTTP for localhost)
    let scheme = url.scheme();
    let is_localhost = url
        .host_str()
        .is_some_and(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]");

    if scheme != "https" && !(scheme == "http" && is_localhost) {
        return Err(RequestError::InvalidUrl {
            value: original.to_string(),
            reason: "must use HTTPS (HTTP allowed only for localhost)".to_string(),
        }
        .into());
    }

    Ok(())
}

impl fmt::Display for UrlHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_endpoints() {
        let urls = UrlHandler::new("prde").unwrap();
        assert_eq!(urls.region_id(), "prde");
        assert_eq!(urls.networks_url(), "https://rest.prde.immedia-semi.com/networks");
        assert_eq!(
            urls.event_url("1234"),
            "https://rest.prde.immedia-semi.com/events/network/1234"
        );
        assert_eq!(
            urls.network_url("1234"),
            "https://rest.prde.immedia-semi.com/network/1234"
        );
    }

    #[test]
    fn login_uses_prod_region() {
        let urls = UrlHandler::new(LOGIN_REGION).unwrap();
        assert_eq!(urls.login_url(), "https://rest.prod.immedia-semi.com/login");
    }

    #[test]
    fn template_without_placeholder_keeps_region_host() {
        let urls = UrlHandler::from_template("http://127.0.0.1:8080/", "prde").unwrap();
        assert_eq!(urls.home_url(), "http://127.0.0.1:8080/homescreen");
        assert_eq!(urls.host(), "prde.immedia-semi.com");
    }

    #[test]
    fn rejects_bad_region_ids() {
        assert!(UrlHandler::new("").is_err());
        assert!(UrlHandler::new("evil.com/").is_err());
    }

    #[test]
    fn rejects_plain_http_off_localhost() {
        assert!(UrlHandler::from_template("http://rest.{region}.example.com", "prde").is_err());
    }
}
