//! Application context - dependency injection container

use std::sync::Arc;

use loginkit_common::{Clock, SystemClock};
use loginkit_core::{
    SessionListener, SessionRepository, SessionService, SessionStore, TokenExchange,
};
use loginkit_domain::{Config, Result};
use loginkit_infra::{
    build_repository, ApiClientConfig, ApiError, AuthorizedClient, HttpTokenExchange,
};
use parking_lot::Mutex;
use tracing::info;

use crate::utils::logging::LoggingSessionListener;
use crate::utils::status::SessionStatus;

/// Application context - holds the session stack built at start-up
pub struct AppContext {
    pub config: Config,
    pub repository: Arc<dyn SessionRepository>,
    pub store: Arc<SessionStore>,
    pub service: SessionService,

    // The store only keeps a weak reference; the context owns the listener.
    listener: Mutex<Arc<dyn SessionListener>>,
}

impl AppContext {
    /// Load configuration and build the context
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or any component
    /// fails to initialize.
    pub fn new() -> Result<Self> {
        let config = loginkit_infra::config::load()?;
        Self::new_with_config(config)
    }

    /// Build the context from an explicit configuration
    ///
    /// # Errors
    /// Returns an error if the storage backend cannot be opened or the token
    /// endpoint configuration is invalid.
    pub fn new_with_config(config: Config) -> Result<Self> {
        let repository = build_repository(&config.storage)?;
        let exchange: Arc<dyn TokenExchange> = Arc::new(HttpTokenExchange::new(&config.identity)?);
        Self::with_components(config, repository, exchange, Arc::new(SystemClock))
    }

    /// Build the context around caller-provided adapters
    ///
    /// # Errors
    /// Returns an error if the persisted session cannot be loaded.
    pub fn with_components(
        config: Config,
        repository: Arc<dyn SessionRepository>,
        exchange: Arc<dyn TokenExchange>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let store = Arc::new(SessionStore::open(Arc::clone(&repository), clock)?);
        let service = SessionService::new(Arc::clone(&store), exchange);

        let listener: Arc<dyn SessionListener> = Arc::new(LoggingSessionListener);
        service.set_listener(&listener);

        info!(
            backend = ?config.storage.backend,
            logged_in = store.is_logged_in(),
            "LoginKit context initialized"
        );

        Ok(Self { config, repository, store, service, listener: Mutex::new(listener) })
    }

    /// Replace the invalidation listener; the context keeps it alive
    pub fn set_listener(&self, listener: Arc<dyn SessionListener>) {
        self.service.set_listener(&listener);
        *self.listener.lock() = listener;
    }

    /// Snapshot of the current session without token values
    pub fn status(&self) -> SessionStatus {
        SessionStatus::new(
            &self.store.token_state(),
            self.store.expires_at(),
            self.store.refresh_token().is_some(),
        )
    }

    /// API client that authenticates through this context's session
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the HTTP client cannot be built.
    pub fn authorized_client(
        &self,
        config: ApiClientConfig,
    ) -> std::result::Result<AuthorizedClient, ApiError> {
        AuthorizedClient::new(config, self.service.queue().clone(), Arc::new(self.service.clone()))
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
