//! Refresh exchange result

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::session::Session;

/// Tokens returned by a successful token exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime in seconds, when the server reports one
    #[serde(default)]
    pub expires_in: Option<i64>,
}

impl TokenGrant {
    /// Session produced by this grant, with `expires_at = now + expires_in`
    ///
    /// A grant without a lifetime, or with one too large to represent,
    /// yields a session with no expiry, which reads as expired.
    #[must_use]
    pub fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_in
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime));
        Session { access_token: self.access_token, refresh_token: self.refresh_token, expires_at }
    }
}
