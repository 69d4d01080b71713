//! Keychain storage backend
//!
//! Maps the session onto three secrets of a [`SecretStore`]. The platform
//! keychain is the production store; any other `SecretStore` (the in-memory
//! one, test mocks) plugs in the same way.

use loginkit_common::security::{KeychainError, KeychainProvider, SecretStore};
use loginkit_core::SessionRepository;
use loginkit_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_EXPIRE_DATE_KEY};
use loginkit_domain::{LoginKitError, Result, Session};
use tracing::debug;

use super::{encode_expiry, session_from_keys};
use crate::errors::InfraError;

/// Session repository over any secret store
#[derive(Debug, Clone)]
pub struct SecretStoreSessionRepository<S: SecretStore> {
    store: S,
}

/// Session repository backed by the platform keychain
pub type KeychainSessionRepository = SecretStoreSessionRepository<KeychainProvider>;

impl KeychainSessionRepository {
    pub fn for_service(service_name: &str) -> Self {
        Self::new(KeychainProvider::new(service_name))
    }
}

impl<S: SecretStore> SecretStoreSessionRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        match self.store.get_secret(key) {
            Ok(value) => Ok(Some(value)),
            Err(KeychainError::NotFound) => Ok(None),
            Err(err) => Err(storage_error(err)),
        }
    }

    fn write_or_delete(&self, key: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => self.store.set_secret(key, value),
            None => self.store.delete_secret(key),
        }
        .map_err(storage_error)
    }
}

fn storage_error(err: KeychainError) -> LoginKitError {
    InfraError::from(err).into()
}

impl<S: SecretStore> SessionRepository for SecretStoreSessionRepository<S> {
    fn load(&self) -> Result<Option<Session>> {
        let access_token = self.read(ACCESS_TOKEN_KEY)?;
        let refresh_token = self.read(REFRESH_TOKEN_KEY)?;
        let expires_at = self.read(TOKEN_EXPIRE_DATE_KEY)?;
        debug!(found = access_token.is_some(), "Loaded session keys");

        Ok(session_from_keys(access_token, refresh_token, expires_at.as_deref()))
    }

    fn save(&self, session: &Session) -> Result<()> {
        self.write_or_delete(ACCESS_TOKEN_KEY, Some(&session.access_token))?;
        self.write_or_delete(REFRESH_TOKEN_KEY, session.refresh_token.as_deref())?;
        let expires_at = session.expires_at.map(encode_expiry);
        self.write_or_delete(TOKEN_EXPIRE_DATE_KEY, expires_at.as_deref())
    }

    fn clear(&self) -> Result<()> {
        // Attempt every key even if one fails, then report the first failure.
        let results = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_EXPIRE_DATE_KEY]
            .map(|key| self.store.delete_secret(key));
        results.into_iter().collect::<std::result::Result<Vec<()>, _>>().map_err(storage_error)?;
        Ok(())
    }
}
