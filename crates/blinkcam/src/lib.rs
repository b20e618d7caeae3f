//! blinkcam - Client library for the Blink home camera API
//!
//! All API traffic flows through a [`Blink`] client. The client logs in,
//! caches the auth header returned by the service and attaches it to every
//! request. When the service rejects a cached header, the client logs in
//! again once and replays the rejected request.
//!
//! # Example
//!
//! ```no_run
//! use blinkcam::Blink;
//!
//! # async fn example() -> Result<(), blinkcam::Error> {
//! let blink = Blink::builder()
//!     .username("alice@example.com")
//!     .password("hunter2")
//!     .build()?;
//!
//! blink.get_auth_token().await?;
//! let ids = blink.get_ids().await?;
//! let summary = blink.summary_request().await?;
//!
//! println!("network {}: {}", ids.network_id, summary);
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod sync_module;
pub mod types;

// Re-export primary types at crate root for convenience
pub use account::{AuthHeader, CredentialPrompt, Credentials, TerminalPrompt};
pub use auth::AuthSession;
pub use client::{AccountIds, Blink, BlinkBuilder};
pub use config::BlinkConfig;
pub use error::Error;
pub use http::{
    ApiResponse, HttpMethod, Reauthenticate, RequestDispatcher, RequestSpec, ReqwestTransport,
    Transport,
};
pub use sync_module::{Camera, SyncModule};
pub use types::{RegionInfo, UrlHandler};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
