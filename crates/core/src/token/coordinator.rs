//! Token access coordinator
//!
//! Serves "give me a currently valid access token" in two phases:
//!
//! 1. **Fetch** with refresh allowed: a missing token fails, a valid token is
//!    returned, an expired token moves on to the refresh.
//! 2. **Refresh**, then **fetch** again with refresh disallowed: a token that
//!    is still expired after the refresh fails with `ExpiredToken`.
//!
//! Every failure invalidates the session with the failure as its reason, so
//! a caller that receives an error always observes a logged-out session.
//!
//! Refresh exchanges are single-flight. The first caller that needs a
//! refresh spawns a driver task; callers arriving while it runs wait on a
//! oneshot channel and share its outcome. The driver runs detached so it
//! completes even when the caller that started it is dropped, and it settles
//! its waiters even when the exchange panics.
//!
//! A grant is only stored while the session still holds the refresh token
//! it was obtained with, so a logout during the exchange stays a logout.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use loginkit_domain::{SessionError, TokenState};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use super::ports::TokenExchange;
use crate::session::SessionStore;

type RefreshOutcome = Result<(), SessionError>;

enum RefreshState {
    Idle,
    Refreshing(Vec<oneshot::Sender<RefreshOutcome>>),
}

/// Hands out valid access tokens, refreshing at most once per call
#[derive(Clone)]
pub struct TokenAccessCoordinator {
    store: Arc<SessionStore>,
    exchange: Arc<dyn TokenExchange>,
    refresh: Arc<Mutex<RefreshState>>,
}

impl TokenAccessCoordinator {
    pub fn new(store: Arc<SessionStore>, exchange: Arc<dyn TokenExchange>) -> Self {
        Self { store, exchange, refresh: Arc::new(Mutex::new(RefreshState::Idle)) }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Resolve a currently valid access token
    ///
    /// Must be polled inside a Tokio runtime; a needed refresh is driven by
    /// a spawned task.
    ///
    /// # Errors
    ///
    /// - `AccessTokenNotFound` when logged out
    /// - `RefreshTokenNotFound` when the token expired and cannot be renewed
    /// - `TokenUpdateFailure` when the refresh exchange failed
    /// - `ExpiredToken` when the refreshed token is still expired
    pub async fn get_access_token(&self) -> Result<String, SessionError> {
        match self.store.token_state() {
            TokenState::Missing => Err(self.fail(SessionError::AccessTokenNotFound)),
            TokenState::Valid(token) => {
                debug!("Access token valid");
                Ok(token)
            }
            TokenState::Expired => {
                debug!("Access token expired, refreshing");
                self.refresh().await?;
                self.fetch_refreshed()
            }
        }
    }

    /// Whether a refresh exchange is currently in flight
    pub fn is_refreshing(&self) -> bool {
        matches!(*self.refresh.lock(), RefreshState::Refreshing(_))
    }

    fn fetch_refreshed(&self) -> Result<String, SessionError> {
        match self.store.token_state() {
            TokenState::Missing => Err(self.fail(SessionError::AccessTokenNotFound)),
            TokenState::Valid(token) => Ok(token),
            TokenState::Expired => Err(self.fail(SessionError::ExpiredToken)),
        }
    }

    fn fail(&self, reason: SessionError) -> SessionError {
        warn!(reason = ?reason, "Access token unavailable");
        self.store.invalidate(Some(reason));
        reason
    }

    async fn refresh(&self) -> RefreshOutcome {
        let (tx, rx) = oneshot::channel();
        let start_driver = {
            let mut state = self.refresh.lock();
            match &mut *state {
                RefreshState::Refreshing(waiters) => {
                    waiters.push(tx);
                    false
                }
                RefreshState::Idle => {
                    *state = RefreshState::Refreshing(vec![tx]);
                    true
                }
            }
        };

        if start_driver {
            let driver = self.clone();
            tokio::spawn(async move { driver.drive_refresh().await });
        } else {
            debug!("Joining in-flight refresh");
        }

        // The settle guard always answers; a closed channel still reads as a failure.
        rx.await.unwrap_or(Err(SessionError::TokenUpdateFailure))
    }

    async fn drive_refresh(self) {
        let mut settle = SettleGuard::new(Arc::clone(&self.refresh));

        settle.outcome = match AssertUnwindSafe(self.exchange_if_expired()).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("Refresh exchange panicked");
                Err(self.fail(SessionError::TokenUpdateFailure))
            }
        };
    }

    async fn exchange_if_expired(&self) -> RefreshOutcome {
        // Another driver may have finished between the caller's read and now.
        if !matches!(self.store.token_state(), TokenState::Expired) {
            debug!("Session changed before refresh, skipping exchange");
            return Ok(());
        }

        let Some(refresh_token) = self.store.refresh_token() else {
            return Err(self.fail(SessionError::RefreshTokenNotFound));
        };

        match self.exchange.refresh(&refresh_token).await {
            Ok(grant) => {
                // A discarded grant leaves the follow-up fetch to judge
                // whatever session is current.
                if self.store.apply_grant(&refresh_token, grant).is_some() {
                    info!("Access token refreshed");
                }
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Refresh exchange failed");
                Err(self.fail(SessionError::TokenUpdateFailure))
            }
        }
    }
}

/// Resets the refresh state and answers every waiter when dropped
///
/// Runs on normal completion and when the driver task is torn down, so
/// waiters never outlive their driver.
struct SettleGuard {
    refresh: Arc<Mutex<RefreshState>>,
    outcome: RefreshOutcome,
}

impl SettleGuard {
    fn new(refresh: Arc<Mutex<RefreshState>>) -> Self {
        Self { refresh, outcome: Err(SessionError::TokenUpdateFailure) }
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        let waiters = match std::mem::replace(&mut *self.refresh.lock(), RefreshState::Idle) {
            RefreshState::Refreshing(waiters) => waiters,
            RefreshState::Idle => Vec::new(),
        };
        debug!(waiters = waiters.len(), ok = self.outcome.is_ok(), "Refresh settled");
        for waiter in waiters {
            // Receiver gone means that caller was dropped; nothing to deliver.
            let _ = waiter.send(self.outcome);
        }
    }
}

impl std::fmt::Debug for TokenAccessCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAccessCoordinator")
            .field("store", &self.store)
            .field("refreshing", &self.is_refreshing())
            .finish_non_exhaustive()
    }
}
