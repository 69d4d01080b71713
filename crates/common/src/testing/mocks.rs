//! Mock implementations of platform integrations

#![allow(clippy::missing_errors_doc)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::security::{KeychainError, SecretStore};

type StorageData = Arc<Mutex<HashMap<String, String>>>;

/// In-memory keychain replacement
///
/// Clones share storage, so a test can inspect what a repository wrote.
/// Writes can be forced to fail to exercise persistence error paths.
#[derive(Debug, Clone)]
pub struct MockKeychainProvider {
    storage: StorageData,
    service_name: String,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl MockKeychainProvider {
    /// Create a new mock keychain provider with a service name for namespacing.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            storage: Arc::new(Mutex::new(HashMap::new())),
            service_name: service_name.into(),
            fail_writes: Arc::new(AtomicBool::new(false)),
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Service name this mock was created with
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Make every subsequent set/delete fail with `AccessFailed`
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful set/delete calls
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Keys currently stored
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.storage.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn check_writable(&self) -> Result<(), KeychainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KeychainError::AccessFailed("mock keychain is read-only".to_string()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl Default for MockKeychainProvider {
    fn default() -> Self {
        Self::new("loginkit-test")
    }
}

impl SecretStore for MockKeychainProvider {
    fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        self.check_writable()?;
        self.storage.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
        self.storage.lock().get(key).cloned().ok_or(KeychainError::NotFound)
    }

    fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
        self.check_writable()?;
        self.storage.lock().remove(key);
        Ok(())
    }

    fn secret_exists(&self, key: &str) -> bool {
        self.storage.lock().contains_key(key)
    }
}
