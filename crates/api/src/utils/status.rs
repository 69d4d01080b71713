//! Session status snapshot for the demo binary and diagnostics
//!
//! Never carries token values, so it can be logged or serialized freely.

use chrono::{DateTime, Utc};
use loginkit_domain::TokenState;
use serde::{Deserialize, Serialize};

/// Point-in-time view of the session
///
/// # Example
/// ```
/// use loginkit_api::SessionStatus;
/// use loginkit_domain::TokenState;
///
/// let status = SessionStatus::new(&TokenState::Missing, None, false);
/// assert!(!status.logged_in);
/// assert_eq!(status.token, "missing");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Whether an access token is present
    pub logged_in: bool,

    /// `missing`, `valid` or `expired`
    pub token: String,

    /// Whether a refresh is possible once the token expires
    pub refreshable: bool,

    pub expires_at: Option<DateTime<Utc>>,

    /// When the snapshot was taken
    pub checked_at: DateTime<Utc>,
}

impl SessionStatus {
    pub fn new(state: &TokenState, expires_at: Option<DateTime<Utc>>, refreshable: bool) -> Self {
        let token = match state {
            TokenState::Missing => "missing",
            TokenState::Valid(_) => "valid",
            TokenState::Expired => "expired",
        };

        Self {
            logged_in: !matches!(state, TokenState::Missing),
            token: token.to_string(),
            refreshable,
            expires_at,
            checked_at: Utc::now(),
        }
    }
}
