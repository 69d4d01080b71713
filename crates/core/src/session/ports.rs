//! Port interfaces for session persistence and notification
//!
//! These traits define the boundaries between the session store and the
//! storage backends and application code that observe it.

use loginkit_domain::{AuthorizationFailure, Result, Session, SessionError};

/// Persistent key space holding the session triple
///
/// Implementations map the session onto the `accessToken`, `refreshToken`
/// and `tokenExpireDate` keys. A missing access token key means logged out.
pub trait SessionRepository: Send + Sync {
    /// Read the persisted session, `None` when logged out
    fn load(&self) -> Result<Option<Session>>;

    /// Overwrite all three keys
    fn save(&self, session: &Session) -> Result<()>;

    /// Remove all three keys
    fn clear(&self) -> Result<()>;
}

/// Receives a notification each time a logged-in session is invalidated
///
/// Called synchronously on the invalidating thread, after the session has
/// been cleared.
pub trait SessionListener: Send + Sync {
    fn session_invalidated(&self, reason: Option<SessionError>);
}

/// Entry point for API adapters that observe authorization failures
pub trait AuthorizationFailureSink: Send + Sync {
    fn report_authorization_failure(&self, failure: AuthorizationFailure);
}
