//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LOG_LEVEL, DEFAULT_REDIRECT_URI, DEFAULT_SERVICE_NAME,
    DEFAULT_SESSION_FILE, DEFAULT_TOKEN_URL,
};
use crate::impl_domain_status_conversions;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub identity: IdentityConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Identity provider (token endpoint) configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub token_url: String,
    pub client_id: String,
    pub redirect_uri: Option<String>,
    pub timeout_seconds: u64,
}

/// Where the session triple is persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Keychain service name
    pub service_name: String,
    /// Session file for the `file` backend
    pub path: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` overrides it
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    Keychain,
    File,
}

impl_domain_status_conversions!(StorageBackend {
    Memory => "memory",
    Keychain => "keychain",
    File => "file",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl_domain_status_conversions!(LogFormat {
    Text => "text",
    Json => "json",
});

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            token_url: DEFAULT_TOKEN_URL.to_string(),
            client_id: String::new(),
            redirect_uri: Some(DEFAULT_REDIRECT_URI.to_string()),
            timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            path: DEFAULT_SESSION_FILE.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), format: LogFormat::default() }
    }
}
