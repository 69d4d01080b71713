//! In-memory `SessionRepository` for core tests
//!
//! Mirrors the three-key layout of the real backends so tests can assert
//! that the triple is always written and cleared as a whole.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use loginkit_core::SessionRepository;
use loginkit_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_EXPIRE_DATE_KEY};
use loginkit_domain::{Result as DomainResult, Session};
use parking_lot::Mutex;

#[derive(Default)]
pub struct MemorySessionRepository {
    keys: Mutex<HashMap<&'static str, String>>,
}

impl MemorySessionRepository {
    /// Keys currently present, sorted.
    pub fn present_keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<_> = self.keys.lock().keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    pub fn value(&self, key: &str) -> Option<String> {
        self.keys.lock().get(key).cloned()
    }
}

impl SessionRepository for MemorySessionRepository {
    fn load(&self) -> DomainResult<Option<Session>> {
        let keys = self.keys.lock();
        Ok(keys.get(ACCESS_TOKEN_KEY).map(|access| Session {
            access_token: access.clone(),
            refresh_token: keys.get(REFRESH_TOKEN_KEY).cloned(),
            expires_at: keys
                .get(TOKEN_EXPIRE_DATE_KEY)
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map(|at| at.with_timezone(&Utc)),
        }))
    }

    fn save(&self, session: &Session) -> DomainResult<()> {
        let mut keys = self.keys.lock();
        keys.clear();
        keys.insert(ACCESS_TOKEN_KEY, session.access_token.clone());
        if let Some(refresh) = &session.refresh_token {
            keys.insert(REFRESH_TOKEN_KEY, refresh.clone());
        }
        if let Some(expires_at) = session.expires_at {
            keys.insert(TOKEN_EXPIRE_DATE_KEY, expires_at.to_rfc3339());
        }
        Ok(())
    }

    fn clear(&self) -> DomainResult<()> {
        self.keys.lock().clear();
        Ok(())
    }
}
