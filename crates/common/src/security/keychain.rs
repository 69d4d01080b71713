//! Generic keychain provider for secure credential storage
//!
//! Thin wrapper over the platform keychain for storing arbitrary secrets
//! across macOS (Keychain Access), Windows (Credential Manager), and Linux
//! (Secret Service API).
//!
//! ## Usage
//!
//! ```no_run
//! use loginkit_common::security::{KeychainProvider, SecretStore};
//!
//! let keychain = KeychainProvider::new("LoginKit.session");
//! keychain.set_secret("accessToken", "super-secret")?;
//! let secret = keychain.get_secret("accessToken")?;
//! assert_eq!(secret, "super-secret");
//! # Ok::<(), loginkit_common::security::KeychainError>(())
//! ```

use std::time::Duration;

use keyring::Entry;
use thiserror::Error;
use tracing::debug;

use crate::error::{ErrorClassification, ErrorSeverity};

/// Key/value secret storage
///
/// A missing key is reported as [`KeychainError::NotFound`], never as an
/// empty value.
pub trait SecretStore: Send + Sync {
    /// Store a secret value under `key`, replacing any previous value
    ///
    /// # Errors
    /// Returns `KeychainError::AccessFailed` if the backend rejects the write
    fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError>;

    /// Retrieve the secret stored under `key`
    ///
    /// # Errors
    /// Returns `KeychainError::NotFound` if the secret doesn't exist
    fn get_secret(&self, key: &str) -> Result<String, KeychainError>;

    /// Delete the secret stored under `key` (idempotent)
    ///
    /// # Errors
    /// Returns `KeychainError::AccessFailed` if the backend rejects the delete
    fn delete_secret(&self, key: &str) -> Result<(), KeychainError>;

    /// Check if a secret exists
    fn secret_exists(&self, key: &str) -> bool {
        self.get_secret(key).is_ok()
    }
}

/// Platform keychain provider
#[derive(Debug, Clone)]
pub struct KeychainProvider {
    service_name: String,
}

impl KeychainProvider {
    /// Create a new keychain provider for a specific service
    ///
    /// # Arguments
    /// * `service_name` - Service identifier (e.g., "LoginKit.session")
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into() }
    }

    /// Service identifier entries are namespaced under
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    fn create_entry(&self, account: &str) -> Result<Entry, KeychainError> {
        Entry::new(&self.service_name, account).map_err(|e| {
            KeychainError::AccessFailed(format!("Failed to create keychain entry: {}", e))
        })
    }
}

impl SecretStore for KeychainProvider {
    fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, key = %key, "Storing secret in keychain");

        let entry = self.create_entry(key)?;
        entry.set_password(value).map_err(|e| {
            KeychainError::AccessFailed(format!("Failed to store secret for {}: {}", key, e))
        })?;

        Ok(())
    }

    fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
        debug!(service = %self.service_name, key = %key, "Retrieving secret from keychain");

        let entry = self.create_entry(key)?;
        entry.get_password().map_err(|e| {
            if matches!(e, keyring::Error::NoEntry) {
                KeychainError::NotFound
            } else {
                KeychainError::AccessFailed(format!("Failed to retrieve secret for {}: {}", key, e))
            }
        })
    }

    fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, key = %key, "Deleting secret from keychain");

        let entry = self.create_entry(key)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(KeychainError::AccessFailed(format!(
                "Failed to delete secret for {}: {}",
                key, e
            ))),
        }
    }
}

/// Keychain error types
#[derive(Debug, Error)]
pub enum KeychainError {
    /// Keychain access failed (permission denied, not available, etc.)
    #[error("Keychain access failed: {0}")]
    AccessFailed(String),

    /// Entry not found in keychain
    #[error("Entry not found")]
    NotFound,

    /// Underlying keyring library error
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

impl ErrorClassification for KeychainError {
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound => ErrorSeverity::Info,
            Self::AccessFailed(_) | Self::Keyring(_) => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}
