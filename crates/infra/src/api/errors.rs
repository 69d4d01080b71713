//! API-specific error types
//!
//! Provides error classification for authorized API calls.

use std::time::Duration;

use loginkit_common::error::{ErrorClassification, ErrorSeverity};
use loginkit_domain::{LoginKitError, SessionError};
use thiserror::Error;

/// Categories of API errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// No usable session, or the server rejected the token
    Authentication,
    /// Rate limiting errors (429) - retry with backoff
    RateLimit,
    /// Server errors (5xx) - retryable
    Server,
    /// Client errors (4xx except auth) - non-retryable
    Client,
    /// Network/connection errors - retryable
    Network,
    /// Configuration errors - non-retryable
    Config,
}

/// Authorized API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// No access token could be obtained
    #[error("Session unavailable: {0}")]
    Session(#[from] SessionError),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Session(_) | Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server(_) => ApiErrorCategory::Server,
            Self::Client(_) => ApiErrorCategory::Client,
            Self::Network(_) => ApiErrorCategory::Network,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Get suggested retry delay in seconds
    pub fn retry_delay_secs(&self) -> u64 {
        match self.category() {
            ApiErrorCategory::RateLimit => 60,
            ApiErrorCategory::Server => 10,
            ApiErrorCategory::Network => 5,
            ApiErrorCategory::Authentication
            | ApiErrorCategory::Client
            | ApiErrorCategory::Config => 0,
        }
    }
}

impl From<LoginKitError> for ApiError {
    fn from(err: LoginKitError) -> Self {
        match err {
            LoginKitError::Network(msg) => Self::Network(msg),
            LoginKitError::Auth(msg) => Self::Auth(msg),
            LoginKitError::Config(msg) => Self::Config(msg),
            other => Self::Client(other.to_string()),
        }
    }
}

impl ErrorClassification for ApiError {
    // Authentication failures end the session; only a new login helps.
    fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::RateLimit | ApiErrorCategory::Server | ApiErrorCategory::Network
        )
    }

    fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ApiErrorCategory::Authentication
            | ApiErrorCategory::RateLimit
            | ApiErrorCategory::Network => ErrorSeverity::Warning,
            ApiErrorCategory::Server | ApiErrorCategory::Client => ErrorSeverity::Error,
            ApiErrorCategory::Config => ErrorSeverity::Critical,
        }
    }

    fn is_critical(&self) -> bool {
        self.category() == ApiErrorCategory::Config
    }

    fn retry_after(&self) -> Option<Duration> {
        self.is_retryable().then(|| Duration::from_secs(self.retry_delay_secs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ApiError::Session(SessionError::AccessTokenNotFound).category(),
            ApiErrorCategory::Authentication
        );
        assert_eq!(ApiError::RateLimit("test".to_string()).category(), ApiErrorCategory::RateLimit);
        assert_eq!(ApiError::Server("test".to_string()).category(), ApiErrorCategory::Server);
        assert_eq!(ApiError::Network("test".to_string()).category(), ApiErrorCategory::Network);
    }

    #[test]
    fn test_should_retry() {
        assert!(!ApiError::Auth("test".to_string()).is_retryable());
        assert!(ApiError::RateLimit("test".to_string()).is_retryable());
        assert!(ApiError::Server("test".to_string()).is_retryable());
        assert!(!ApiError::Client("test".to_string()).is_retryable());
        assert_eq!(
            ApiError::Network("test".to_string()).retry_after(),
            Some(Duration::from_secs(5))
        );
        assert!(ApiError::Session(SessionError::ExpiredToken).retry_after().is_none());
    }
}
