//! The Blink client facade.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument};

use crate::Result;
use crate::account::{AuthHeader, CredentialPrompt, Credentials, TerminalPrompt};
use crate::auth::{AuthSession, LoginOutcome};
use crate::config::BlinkConfig;
use crate::error::{ProtocolError, RequestError};
use crate::http::{
    ApiResponse, HttpMethod, Reauthenticate, RequestDispatcher, RequestSpec, ReqwestTransport,
    Transport,
};
use crate::sync_module::{SyncModule, id_string};
use crate::types::{RegionInfo, UrlHandler};

/// Name used for a sync module when the networks listing has none.
const DEFAULT_SYNC_NAME: &str = "Blink";

/// Ids discovered for the account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountIds {
    /// Id of the first network on the account.
    pub network_id: String,
    /// Id of the account owning that network.
    pub account_id: String,
}

#[derive(Debug, Deserialize)]
struct NetworksResponse {
    #[serde(default)]
    networks: Vec<NetworkEntry>,
}

#[derive(Debug, Deserialize)]
struct NetworkEntry {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    account_id: Value,
    #[serde(default)]
    name: Option<String>,
}

/// A client for one Blink account.
///
/// The client caches the auth header from the last successful login and
/// attaches it to every API call. If the service rejects the cached header,
/// the call logs in again and is replayed once; the cache then holds the new
/// header.
///
/// Clients are cheap to clone (they use internal `Arc`) and clones share
/// state. Authenticated calls on one client are serialized so a header is
/// never read while it is being replaced.
#[derive(Clone)]
pub struct Blink {
    inner: Arc<BlinkInner>,
}

struct BlinkInner {
    config: BlinkConfig,
    auth: AuthSession,
    dispatcher: RequestDispatcher,
    prompt: Arc<dyn CredentialPrompt>,
    state: RwLock<BlinkState>,
    calls: Mutex<()>,
}

#[derive(Default)]
struct BlinkState {
    credentials: Credentials,
    auth_header: Option<AuthHeader>,
    region: Option<RegionInfo>,
    urls: Option<UrlHandler>,
    ids: Option<AccountIds>,
    sync: Option<SyncModule>,
}

impl Blink {
    /// Start building a client.
    pub fn builder() -> BlinkBuilder {
        BlinkBuilder::default()
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Log in, prompting for any credential that was not configured.
    ///
    /// Prompted values are stored on the client.
    ///
    /// # Errors
    ///
    /// Returns an authentication error if prompting or the login fails.
    #[instrument(skip(self))]
    pub async fn login(&self) -> Result<bool> {
        let mut credentials = self.inner.state.read().await.credentials.clone();
        let result = self
            .inner
            .auth
            .interactive_login(&mut credentials, self.inner.prompt.as_ref())
            .await;

        self.inner.state.write().await.credentials = credentials;
        self.finish_login(result).await?;
        Ok(true)
    }

    /// Log in with the stored credentials and cache the resulting header.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingCredential`](crate::error::AuthError) if
    /// either credential is absent (nothing is sent), or another
    /// authentication error if the login fails. A failed login clears the
    /// cached header.
    #[instrument(skip(self))]
    pub async fn get_auth_token(&self) -> Result<AuthHeader> {
        let credentials = self.inner.state.read().await.credentials.clone();
        let result = self.inner.auth.authenticate(&credentials).await;
        self.finish_login(result).await
    }

    async fn finish_login(&self, result: Result<LoginOutcome>) -> Result<AuthHeader> {
        let mut state = self.inner.state.write().await;
        match result {
            Ok(outcome) => {
                state.auth_header = Some(outcome.header.clone());
                state.region = Some(outcome.region);
                state.urls = Some(outcome.urls);
                Ok(outcome.header)
            }
            Err(e) => {
                if e.is_auth_error() {
                    state.auth_header = None;
                }
                Err(e)
            }
        }
    }

    /// Install an auth header obtained elsewhere, replacing the cached one.
    ///
    /// The header is used as-is. If the service rejects it, the next call
    /// logs in again with the stored credentials.
    pub async fn restore_auth_header(&self, header: AuthHeader) {
        self.inner.state.write().await.auth_header = Some(header);
    }

    /// Store a username for later logins.
    ///
    /// The cached auth header is left alone.
    pub async fn set_username(&self, username: impl Into<String>) {
        self.inner.state.write().await.credentials.set_username(username);
    }

    /// Store a password for later logins.
    ///
    /// The cached auth header is left alone.
    pub async fn set_password(&self, password: impl Into<String>) {
        self.inner.state.write().await.credentials.set_password(password);
    }

    /// Set the endpoints used for API calls.
    ///
    /// Normally these come from the region in the login response.
    pub async fn set_urls(&self, urls: UrlHandler) {
        self.inner.state.write().await.urls = Some(urls);
    }

    // ========================================================================
    // API Operations
    // ========================================================================

    /// Discover the network and account ids.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::NoAuthHeader`] or
    /// [`RequestError::RegionUnresolved`] before login, and a protocol error
    /// if the account lists no network.
    #[instrument(skip(self))]
    pub async fn get_ids(&self) -> Result<AccountIds> {
        let (ids, _) = self.discover().await?;
        Ok(ids)
    }

    /// Fetch the networks listing and store the first network's ids.
    ///
    /// Also returns that network's name.
    async fn discover(&self) -> Result<(AccountIds, String)> {
        let response = self
            .authed(HttpMethod::Get, |urls| urls.networks_url())
            .await?;
        let (ids, name) = parse_networks(&response)?;

        debug!(network_id = %ids.network_id, "Discovered account ids");
        self.inner.state.write().await.ids = Some(ids.clone());
        Ok((ids, name))
    }

    /// Fetch the account summary (homescreen).
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::NoAuthHeader`] or
    /// [`RequestError::RegionUnresolved`] before login, or any dispatch error.
    #[instrument(skip(self))]
    pub async fn summary_request(&self) -> Result<Value> {
        let response = self
            .authed(HttpMethod::Get, |urls| urls.home_url())
            .await?;
        Ok(response.into_body())
    }

    /// Send an arbitrary request with the cached auth header, if any.
    ///
    /// `method` must be `get`, `post` or `put`; anything else fails before a
    /// request is sent. With `is_retry` set, an auth rejection is returned as
    /// an error instead of triggering a re-authentication.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::UnsupportedMethod`] for an unknown method, or
    /// any dispatch error.
    #[instrument(skip(self, body))]
    pub async fn http_request(
        &self,
        method: &str,
        url: &str,
        body: Option<Value>,
        is_retry: bool,
    ) -> Result<ApiResponse> {
        let mut request = RequestSpec::parse(method, url)?.retry(is_retry);
        if let Some(body) = body {
            request = request.json(body);
        }

        let _guard = self.inner.calls.lock().await;
        if let Some(header) = self.auth_header().await {
            request = request.with_auth(&header)?;
        }
        self.inner.dispatcher.dispatch(request, self).await
    }

    /// Log in if needed, discover ids and build the sync module registry.
    ///
    /// Missing credentials are prompted for.
    ///
    /// # Errors
    ///
    /// Returns the first error from login, discovery or the summary request.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<()> {
        if self.auth_header().await.is_none() {
            let credentials = self.credentials().await;
            if !credentials.has_username() || !credentials.has_password() {
                self.login().await?;
            } else {
                self.get_auth_token().await?;
            }
        }

        let (ids, name) = self.discover().await?;
        let summary = self.summary_request().await?;

        let module = SyncModule::from_summary(&ids.network_id, name, &summary);
        info!(
            network_id = %ids.network_id,
            cameras = module.cameras().len(),
            "Sync module ready"
        );

        self.inner.state.write().await.sync = Some(module);
        Ok(())
    }

    /// Re-fetch the summary and update the sync module registry.
    ///
    /// If no registry exists yet, the networks listing is fetched first to
    /// name it.
    ///
    /// # Errors
    ///
    /// Returns any error from discovery or the summary request.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<()> {
        let discovered = match self.sync_module().await {
            Some(_) => None,
            None => Some(self.discover().await?),
        };
        let summary = self.summary_request().await?;

        let mut state = self.inner.state.write().await;
        if let Some(module) = state.sync.as_mut() {
            module.update(&summary);
        } else if let Some((ids, name)) = discovered {
            state.sync = Some(SyncModule::from_summary(&ids.network_id, name, &summary));
        }
        Ok(())
    }

    async fn authed(
        &self,
        method: HttpMethod,
        endpoint: impl FnOnce(&UrlHandler) -> String,
    ) -> Result<ApiResponse> {
        let _guard = self.inner.calls.lock().await;

        let (header, url) = {
            let state = self.inner.state.read().await;
            let header = state
                .auth_header
                .clone()
                .ok_or(RequestError::NoAuthHeader)?;
            let urls = state.urls.as_ref().ok_or(RequestError::RegionUnresolved)?;
            (header, endpoint(urls))
        };

        let request = RequestSpec::new(method, url).with_auth(&header)?;
        self.inner.dispatcher.dispatch(request, self).await
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns the configuration.
    pub fn config(&self) -> &BlinkConfig {
        &self.inner.config
    }

    /// Returns the cached auth header.
    pub async fn auth_header(&self) -> Option<AuthHeader> {
        self.inner.state.read().await.auth_header.clone()
    }

    /// Returns the stored credentials.
    pub async fn credentials(&self) -> Credentials {
        self.inner.state.read().await.credentials.clone()
    }

    /// Returns the account region, once logged in.
    pub async fn region(&self) -> Option<RegionInfo> {
        self.inner.state.read().await.region.clone()
    }

    /// Returns the endpoints in use, once known.
    pub async fn urls(&self) -> Option<UrlHandler> {
        self.inner.state.read().await.urls.clone()
    }

    /// Returns the discovered account ids.
    pub async fn account_ids(&self) -> Option<AccountIds> {
        self.inner.state.read().await.ids.clone()
    }

    /// Returns the sync module registry, once built.
    pub async fn sync_module(&self) -> Option<SyncModule> {
        self.inner.state.read().await.sync.clone()
    }
}

#[async_trait]
impl Reauthenticate for Blink {
    async fn reauthenticate(&self) -> Result<AuthHeader> {
        self.inner.state.write().await.auth_header = None;
        self.get_auth_token().await
    }
}

fn parse_networks(response: &ApiResponse) -> Result<(AccountIds, String)> {
    let networks: NetworksResponse = response.json()?;
    let missing = |what: &str| ProtocolError::new(response.status(), Some(format!("missing {what}")));

    let first = networks
        .networks
        .into_iter()
        .next()
        .ok_or_else(|| missing("networks"))?;
    let network_id = id_string(&first.id).ok_or_else(|| missing("network id"))?;
    let account_id = id_string(&first.account_id).ok_or_else(|| missing("account id"))?;
    let name = first.name.unwrap_or_else(|| DEFAULT_SYNC_NAME.to_string());

    Ok((
        AccountIds {
            network_id,
            account_id,
        },
        name,
    ))
}

// Custom Debug impl that hides sensitive data
impl std::fmt::Debug for Blink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blink")
            .field("config", &self.inner.config)
            .field("dispatcher", &self.inner.dispatcher)
            .field("state", &"[REDACTED]")
            .finish()
    }
}

/// Builder for [`Blink`].
///
/// The transport defaults to a `reqwest` client built from the configuration
/// and the prompt to the terminal.
#[derive(Default)]
pub struct BlinkBuilder {
    credentials: Credentials,
    config: BlinkConfig,
    transport: Option<Arc<dyn Transport>>,
    prompt: Option<Arc<dyn CredentialPrompt>>,
}

impl BlinkBuilder {
    /// Set the account username (email).
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.credentials.set_username(username);
        self
    }

    /// Set the account password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.credentials.set_password(password);
        self
    }

    /// Replace both credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Set the configuration.
    pub fn config(mut self, config: BlinkConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom credential prompt.
    pub fn prompt(mut self, prompt: Arc<dyn CredentialPrompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the default HTTP transport cannot be created.
    pub fn build(self) -> Result<Blink> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&self.config)?),
        };
        let prompt: Arc<dyn CredentialPrompt> = match self.prompt {
            Some(prompt) => prompt,
            None => Arc::new(TerminalPrompt),
        };

        Ok(Blink {
            inner: Arc::new(BlinkInner {
                auth: AuthSession::new(transport.clone(), self.config.clone()),
                dispatcher: RequestDispatcher::new(transport),
                config: self.config,
                prompt,
                state: RwLock::new(BlinkState {
                    credentials: self.credentials,
                    ..BlinkState::default()
                }),
                calls: Mutex::new(()),
            }),
        })
    }
}
