//! Session repository backends
//!
//! Every backend persists the session as the three named keys
//! (`accessToken`, `refreshToken`, `tokenExpireDate`); a missing access
//! token key reads as logged out.

pub mod file;
pub mod keychain;
pub mod memory;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use loginkit_core::SessionRepository;
use loginkit_domain::{Result, Session, StorageBackend, StorageConfig};
use tracing::{info, warn};

pub use file::FileSessionRepository;
pub use keychain::{KeychainSessionRepository, SecretStoreSessionRepository};
pub use memory::{MemorySecretStore, MemorySessionRepository};

/// Build the repository selected by `config`
///
/// # Errors
///
/// Currently infallible for every backend; kept fallible so that backends
/// needing setup can report it.
pub fn build_repository(config: &StorageConfig) -> Result<Arc<dyn SessionRepository>> {
    info!(backend = %config.backend, "Selecting session storage backend");
    let repository: Arc<dyn SessionRepository> = match config.backend {
        StorageBackend::Memory => Arc::new(MemorySessionRepository::default()),
        StorageBackend::Keychain => {
            Arc::new(KeychainSessionRepository::for_service(&config.service_name))
        }
        StorageBackend::File => Arc::new(FileSessionRepository::new(PathBuf::from(&config.path))),
    };
    Ok(repository)
}

/// Serialized form of the `tokenExpireDate` key
pub(crate) fn encode_expiry(expires_at: DateTime<Utc>) -> String {
    expires_at.to_rfc3339()
}

/// Parse a stored expiry; an unreadable value reads as absent (expired)
pub(crate) fn decode_expiry(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(at) => Some(at.with_timezone(&Utc)),
        Err(err) => {
            warn!(error = %err, "Ignoring unreadable token expiry");
            None
        }
    }
}

/// Assemble a session from the three raw key values
pub(crate) fn session_from_keys(
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<&str>,
) -> Option<Session> {
    access_token.map(|access_token| Session {
        access_token,
        refresh_token,
        expires_at: expires_at.and_then(decode_expiry),
    })
}
