//! Session service - the facade applications talk to

use std::sync::Arc;

use chrono::{DateTime, Utc};
use loginkit_domain::{AuthorizationFailure, SessionError, TokenState};

use crate::session::ports::{AuthorizationFailureSink, SessionListener};
use crate::session::SessionStore;
use crate::token::ports::TokenExchange;
use crate::token::{TokenAccessCoordinator, TokenDependentQueue};

/// Login state, token access and invalidation in one place
#[derive(Clone, Debug)]
pub struct SessionService {
    store: Arc<SessionStore>,
    coordinator: TokenAccessCoordinator,
    queue: TokenDependentQueue,
}

impl SessionService {
    /// Wire a coordinator and queue around `store`
    pub fn new(store: Arc<SessionStore>, exchange: Arc<dyn TokenExchange>) -> Self {
        let coordinator = TokenAccessCoordinator::new(Arc::clone(&store), exchange);
        let queue = TokenDependentQueue::new(coordinator.clone());
        Self { store, coordinator, queue }
    }

    pub fn login(
        &self,
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) {
        self.store.login(access_token, refresh_token, expires_at);
    }

    pub fn logout(&self) -> bool {
        self.store.logout()
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.is_logged_in()
    }

    pub fn token_state(&self) -> TokenState {
        self.store.token_state()
    }

    /// See [`TokenAccessCoordinator::get_access_token`]
    ///
    /// # Errors
    ///
    /// Returns the [`SessionError`] the session was invalidated with.
    pub async fn get_access_token(&self) -> Result<String, SessionError> {
        self.coordinator.get_access_token().await
    }

    /// Token for a dependent API call, coalesced with concurrent callers
    ///
    /// # Errors
    ///
    /// Returns the [`SessionError`] shared by every coalesced caller.
    pub async fn acquire_token(&self) -> Result<String, SessionError> {
        self.queue.acquire().await
    }

    /// Callback flavour of [`Self::acquire_token`]
    pub fn submit<F>(&self, task: F)
    where
        F: FnOnce(Result<String, SessionError>) + Send + 'static,
    {
        self.queue.submit(task);
    }

    pub fn set_listener(&self, listener: &Arc<dyn SessionListener>) {
        self.store.set_listener(listener);
    }

    pub fn clear_listener(&self) {
        self.store.clear_listener();
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn queue(&self) -> &TokenDependentQueue {
        &self.queue
    }
}

impl AuthorizationFailureSink for SessionService {
    fn report_authorization_failure(&self, failure: AuthorizationFailure) {
        self.store.report_authorization_failure(failure);
    }
}
