//! Port interface for the identity provider's token exchange

use std::time::Duration;

use async_trait::async_trait;
use loginkit_common::error::{ErrorClassification, ErrorSeverity};
use loginkit_domain::TokenGrant;
use thiserror::Error;

/// Exchanges a refresh token for a new grant
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Perform one refresh exchange
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, TokenExchangeError>;
}

/// Failure of a refresh exchange
#[derive(Debug, Error)]
pub enum TokenExchangeError {
    /// Transport failure before a response was received
    #[error("Network error: {0}")]
    Network(String),

    /// The endpoint rejected the grant (OAuth2 error response)
    #[error("Token endpoint returned {status}: {error}")]
    Rejected { status: u16, error: String, description: Option<String> },

    /// The endpoint answered with something that is not a token response
    #[error("Invalid token response: {0}")]
    InvalidResponse(String),
}

impl ErrorClassification for TokenExchangeError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Rejected { status, .. } => *status >= 500 || *status == 429,
            Self::InvalidResponse(_) => false,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Network(_) | Self::Rejected { .. } => ErrorSeverity::Warning,
            Self::InvalidResponse(_) => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        false
    }

    fn retry_after(&self) -> Option<Duration> {
        self.is_retryable().then(|| Duration::from_secs(1))
    }
}
