//! Application context - dependency injection container

use std::sync::Arc;

use autonomos_common::auth::{OAuthClient, OAuthConfig, TokenStore};
use autonomos_common::{AuthSession, AuthSessionService, Clock, MemoryStore, SystemClock};
use autonomos_core::{CoordinatorDeps, CurrentSession, ExpiryPrompt, Navigator, SessionExpiryBus};
use autonomos_domain::{AppConfig, AuthSettings, Result};
use autonomos_infra::{config, map_auth_error, map_storage_error, ApiSessionHook, FileStore};
use autonomos_infra::{HttpClient, HttpClientBuilder};

/// Holds the session services for one process
///
/// Pending login state lives in memory, so a login must finish in the
/// process that started it. Tokens live in the origin-scoped file store.
pub struct AppContext {
    pub config: AppConfig,
    pub auth: AuthSessionService,
    pub token_store: Arc<TokenStore>,
    pub bus: Arc<SessionExpiryBus>,
    pub current_session: Arc<CurrentSession>,
    pub api: ApiSessionHook,
    clock: Arc<dyn Clock>,
}

impl AppContext {
    /// Create a context from the environment or a config file.
    ///
    /// # Errors
    /// Returns `AutonomosError::Config` if no complete configuration is found.
    pub fn new() -> Result<Self> {
        Self::new_with_config(config::load()?)
    }

    /// Create a context from an explicit configuration.
    ///
    /// # Errors
    /// - `AutonomosError::Config` if an identity provider setting is missing
    /// - `AutonomosError::Storage` if the data directory cannot be created
    pub fn new_with_config(config: AppConfig) -> Result<Self> {
        Self::new_with_clock(config, Arc::new(SystemClock))
    }

    /// Create a context with a custom clock.
    ///
    /// Tests use this to pin token expiry relative to a known time.
    ///
    /// # Errors
    /// Same as [`new_with_config`](Self::new_with_config).
    pub fn new_with_clock(config: AppConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;

        let durable = FileStore::open(&config.storage.data_dir, config.storage.origin.as_str())
            .map_err(map_storage_error)?;
        let token_store = Arc::new(TokenStore::new(Arc::new(durable)));

        let client = OAuthClient::new(oauth_config(&config.auth), Arc::new(MemoryStore::new()))
            .map_err(map_auth_error)?;
        let auth = AuthSessionService::new(Arc::new(client), token_store.clone(), clock.clone());

        let bus = SessionExpiryBus::new();
        let current_session = Arc::new(CurrentSession::new(auth.get_session()));
        let api = ApiSessionHook::new(auth.clone(), bus.clone());

        tracing::info!(
            origin = %config.storage.origin,
            data_dir = %config.storage.data_dir.display(),
            signed_in = current_session.is_signed_in(),
            "application context initialized"
        );

        Ok(Self { config, auth, token_store, bus, current_session, api, clock })
    }

    /// Re-read the stored tokens into the in-memory session.
    pub fn refresh_session(&self) -> Option<AuthSession> {
        match self.auth.get_session() {
            Some(session) => {
                self.current_session.set(session.clone());
                Some(session)
            }
            None => {
                self.current_session.clear();
                None
            }
        }
    }

    /// Everything a timeout coordinator needs, bound to the given UI.
    pub fn coordinator_deps(
        &self,
        navigator: Arc<dyn Navigator>,
        prompt: Arc<dyn ExpiryPrompt>,
    ) -> CoordinatorDeps {
        CoordinatorDeps {
            bus: self.bus.clone(),
            current_session: self.current_session.clone(),
            token_store: self.token_store.clone(),
            navigator,
            prompt,
            clock: self.clock.clone(),
        }
    }

    /// HTTP client whose authorised requests report back to this session.
    pub fn http_client_builder(&self) -> HttpClientBuilder {
        HttpClient::builder()
            .user_agent(concat!("autonomos/", env!("CARGO_PKG_VERSION")))
            .session(self.api.clone())
    }

    #[must_use]
    pub fn now(&self) -> i64 {
        self.clock.epoch_seconds()
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("origin", &self.config.storage.origin)
            .field("signed_in", &self.current_session.is_signed_in())
            .finish_non_exhaustive()
    }
}

/// Identity provider settings as the OAuth client expects them.
#[must_use]
pub fn oauth_config(settings: &AuthSettings) -> OAuthConfig {
    let mut config = OAuthConfig::new(
        settings.domain.as_str(),
        settings.client_id.as_str(),
        settings.redirect_uri.as_str(),
        settings.logout_uri.as_str(),
    );
    if let Some(provider) = &settings.identity_provider {
        config = config.with_identity_provider(provider.as_str());
    }
    if let Some(timeout) = settings.token_exchange_timeout() {
        config = config.with_exchange_timeout(timeout);
    }
    config
}
