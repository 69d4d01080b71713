use loginkit_core::SessionListener;
use loginkit_domain::SessionError;
use tracing::{info, warn};

/// Stable label for an invalidation reason, suitable for log fields.
#[inline]
pub fn reason_label(reason: Option<SessionError>) -> &'static str {
    match reason {
        None => "logout",
        Some(SessionError::AccessTokenNotFound) => "access_token_not_found",
        Some(SessionError::RefreshTokenNotFound) => "refresh_token_not_found",
        Some(SessionError::ExpiredToken) => "expired_token",
        Some(SessionError::TokenUpdateFailure) => "token_update_failure",
        Some(SessionError::InvalidToken) => "invalid_token",
    }
}

/// Session listener that records invalidations as structured log events.
///
/// Token values never reach the log; only the reason label does.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSessionListener;

impl SessionListener for LoggingSessionListener {
    fn session_invalidated(&self, reason: Option<SessionError>) {
        let reason_label = reason_label(reason);
        match reason {
            None => info!(reason = reason_label, "session_invalidated"),
            Some(_) => warn!(reason = reason_label, "session_invalidated"),
        }
    }
}
