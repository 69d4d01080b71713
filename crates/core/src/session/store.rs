//! Session store - the single owner of the credential triple

use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use loginkit_common::time::Clock;
use loginkit_domain::{AuthorizationFailure, Result, Session, SessionError, TokenGrant, TokenState};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info};

use super::ports::{AuthorizationFailureSink, SessionListener, SessionRepository};

/// Owns the persisted session and notifies a listener on invalidation
///
/// The in-memory session is authoritative for the running process. Every
/// mutation replaces the whole triple and writes it through to the
/// repository while the write lock is held, so readers never observe a
/// partially updated session. Persistence failures are logged and do not
/// change the in-memory outcome.
pub struct SessionStore {
    repository: Arc<dyn SessionRepository>,
    clock: Arc<dyn Clock>,
    session: RwLock<Option<Session>>,
    listener: Mutex<Option<Weak<dyn SessionListener>>>,
}

impl SessionStore {
    /// Load the persisted session from `repository`
    ///
    /// # Errors
    ///
    /// Returns the repository error when the persisted session cannot be
    /// read.
    pub fn open(repository: Arc<dyn SessionRepository>, clock: Arc<dyn Clock>) -> Result<Self> {
        let session = repository.load()?;
        info!(logged_in = session.is_some(), "Session store opened");

        Ok(Self { repository, clock, session: RwLock::new(session), listener: Mutex::new(None) })
    }

    /// Store a new session, replacing whatever was there
    pub fn login(
        &self,
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) {
        let session = Session::new(access_token, refresh_token, expires_at);
        self.replace(session);
        info!(expires_at = ?expires_at, "User logged in");
    }

    /// Equivalent to `invalidate(None)`
    pub fn logout(&self) -> bool {
        self.invalidate(None)
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.read().is_some()
    }

    /// Clear the session and notify the listener
    ///
    /// Returns `false` without notifying when already logged out.
    pub fn invalidate(&self, reason: Option<SessionError>) -> bool {
        {
            let mut session = self.session.write();
            if session.take().is_none() {
                debug!(reason = ?reason, "Invalidate ignored, already logged out");
                return false;
            }
            if let Err(err) = self.repository.clear() {
                error!(error = %err, "Failed to clear persisted session");
            }
        }

        info!(reason = ?reason, "Session invalidated");
        self.notify(reason);
        true
    }

    /// Register the single listener; the previous one is replaced
    ///
    /// Only a weak reference is kept, so dropping the listener elsewhere
    /// unregisters it.
    pub fn set_listener(&self, listener: &Arc<dyn SessionListener>) {
        *self.listener.lock() = Some(Arc::downgrade(listener));
    }

    pub fn clear_listener(&self) {
        self.listener.lock().take();
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.session.read().as_ref().map(|session| session.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.session.read().as_ref().and_then(|session| session.refresh_token.clone())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.session.read().as_ref().and_then(|session| session.expires_at)
    }

    /// Classify the access token against the store's clock
    pub fn token_state(&self) -> TokenState {
        let now = self.clock.now();
        TokenState::of(self.session.read().as_ref(), now)
    }

    /// Store the result of a refresh exchange made with `refresh_token`
    ///
    /// The grant is discarded, and `None` returned, when the session no
    /// longer holds that refresh token: a logout or a new login happened
    /// while the exchange was in flight.
    pub fn apply_grant(&self, refresh_token: &str, grant: TokenGrant) -> Option<Session> {
        let session = grant.into_session(self.clock.now());

        let mut current = self.session.write();
        let unchanged = current
            .as_ref()
            .and_then(|current| current.refresh_token.as_deref())
            .is_some_and(|current| current == refresh_token);
        if !unchanged {
            debug!("Session changed during refresh, grant discarded");
            return None;
        }

        if let Err(err) = self.repository.save(&session) {
            error!(error = %err, "Failed to persist session");
        }
        *current = Some(session.clone());
        drop(current);

        info!(expires_at = ?session.expires_at, "Session refreshed");
        Some(session)
    }

    fn replace(&self, session: Session) {
        let mut current = self.session.write();
        if let Err(err) = self.repository.save(&session) {
            error!(error = %err, "Failed to persist session");
        }
        *current = Some(session);
    }

    fn notify(&self, reason: Option<SessionError>) {
        let listener = self.listener.lock().as_ref().and_then(Weak::upgrade);
        match listener {
            Some(listener) => listener.session_invalidated(reason),
            None => debug!("No session listener registered"),
        }
    }
}

impl AuthorizationFailureSink for SessionStore {
    fn report_authorization_failure(&self, failure: AuthorizationFailure) {
        let reason = match failure {
            AuthorizationFailure::InvalidToken => Some(SessionError::InvalidToken),
            AuthorizationFailure::Other => None,
        };
        self.invalidate(reason);
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token values stay out of debug output.
        f.debug_struct("SessionStore")
            .field("logged_in", &self.is_logged_in())
            .field("expires_at", &self.expires_at())
            .finish_non_exhaustive()
    }
}
