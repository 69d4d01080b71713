//! The persisted credential triple

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Credentials of a logged-in user
///
/// A logged-out user has no `Session` at all, so the three values are
/// always present or absent together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Absent expiry is treated as already expired
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self { access_token: access_token.into(), refresh_token, expires_at }
    }

    /// True when `now` is at or past the expiry, or no expiry is known
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |expires_at| now >= expires_at)
    }

    /// Classify the access token against `now`
    #[must_use]
    pub fn state_at(&self, now: DateTime<Utc>) -> TokenState {
        if self.is_expired_at(now) {
            TokenState::Expired
        } else {
            TokenState::Valid(self.access_token.clone())
        }
    }
}

/// Access token state as seen at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenState {
    /// Logged out
    Missing,
    /// Usable without a refresh
    Valid(String),
    /// Present but past its expiry (or expiry unknown)
    Expired,
}

impl TokenState {
    /// Classify an optional session against `now`
    #[must_use]
    pub fn of(session: Option<&Session>, now: DateTime<Utc>) -> Self {
        session.map_or(Self::Missing, |session| session.state_at(now))
    }
}
