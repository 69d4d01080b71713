//! Error types used throughout LoginKit

use std::time::Duration;

use loginkit_common::error::{ErrorClassification, ErrorSeverity};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a token request failed, or why a session was invalidated
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionError {
    #[error("access token expired")]
    ExpiredToken,

    #[error("token refresh failed")]
    TokenUpdateFailure,

    #[error("access token not found")]
    AccessTokenNotFound,

    #[error("refresh token not found")]
    RefreshTokenNotFound,

    #[error("access token rejected by server")]
    InvalidToken,
}

impl ErrorClassification for SessionError {
    // Every variant ends the session; the user has to log in again.
    fn is_retryable(&self) -> bool {
        false
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AccessTokenNotFound => ErrorSeverity::Info,
            Self::ExpiredToken | Self::RefreshTokenNotFound | Self::InvalidToken => {
                ErrorSeverity::Warning
            }
            Self::TokenUpdateFailure => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Main error type for LoginKit infrastructure
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum LoginKitError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for LoginKitError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<SessionError> for LoginKitError {
    fn from(err: SessionError) -> Self {
        Self::Auth(err.to_string())
    }
}

impl ErrorClassification for LoginKitError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Network(_) | Self::Auth(_) => ErrorSeverity::Warning,
            Self::Config(_) | Self::Storage(_) | Self::Serialization(_) => ErrorSeverity::Error,
            Self::Internal(_) => ErrorSeverity::Critical,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Internal(_))
    }

    fn retry_after(&self) -> Option<Duration> {
        self.is_retryable().then(|| Duration::from_secs(1))
    }
}

/// Result type alias for LoginKit operations
pub type Result<T> = std::result::Result<T, LoginKitError>;
