//! In-process storage backend

use std::collections::HashMap;
use std::sync::Arc;

use loginkit_common::security::{KeychainError, SecretStore};
use parking_lot::RwLock;

use super::keychain::SecretStoreSessionRepository;

/// Secret store that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemorySecretStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl SecretStore for MemorySecretStore {
    fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
        self.entries.read().get(key).cloned().ok_or(KeychainError::NotFound)
    }

    fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn secret_exists(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }
}

/// Session repository that forgets everything on exit
pub type MemorySessionRepository = SecretStoreSessionRepository<MemorySecretStore>;

impl Default for MemorySessionRepository {
    fn default() -> Self {
        Self::new(MemorySecretStore::default())
    }
}
