//! Error classification shared by every LoginKit error type
//!
//! Module-specific errors stay in their own crates (`SessionError` in the
//! domain, `TokenExchangeError` in core, `KeychainError` here) and implement
//! [`ErrorClassification`] so that logging and callers can treat them
//! uniformly.
//!
//! ## ErrorSeverity Levels
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions | Logged out, missing session keys |
//! | **Warning** | Degraded but operational | Refresh rejected, transient network failure |
//! | **Error** | Failure requiring attention | Keychain access denied, bad configuration |
//! | **Critical** | System integrity at risk | Corrupted persisted session |
//!
//! ## Example
//!
//! ```rust,ignore
//! use loginkit_common::error::{ErrorClassification, ErrorSeverity};
//! use thiserror::Error;
//!
//! #[derive(Debug, Error)]
//! pub enum WidgetError {
//!     #[error("Widget not found: {0}")]
//!     NotFound(String),
//! }
//!
//! impl ErrorClassification for WidgetError {
//!     fn is_retryable(&self) -> bool {
//!         false
//!     }
//!
//!     fn severity(&self) -> ErrorSeverity {
//!         ErrorSeverity::Info
//!     }
//!
//!     fn is_critical(&self) -> bool {
//!         false
//!     }
//!
//!     fn retry_after(&self) -> Option<std::time::Duration> {
//!         None
//!     }
//! }
//! ```

use std::fmt;
use std::time::Duration;

/// Standard interface for classifying errors by their characteristics
pub trait ErrorClassification {
    /// Check if this error is retryable
    ///
    /// Retryable errors are transient issues that may succeed if attempted
    /// again, such as network timeouts or a temporarily unavailable identity
    /// provider.
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    ///
    /// Used for logging and alerting decisions.
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}
