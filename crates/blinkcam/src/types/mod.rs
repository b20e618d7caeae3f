//! Validated types for the Blink service.

mod region;
mod urls;

pub use region::RegionInfo;
pub use urls::{API_DOMAIN, DEFAULT_API_BASE_TEMPLATE, LOGIN_REGION, UrlHandler};
