//! Structured logging setup
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a text
//! or JSON formatting layer. `RUST_LOG` takes precedence over the configured
//! level.

use loginkit_domain::{LogFormat, LoggingConfig, LoginKitError, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Build the filter: `RUST_LOG` if set, else the configured directive
///
/// # Errors
/// Returns `LoginKitError::Config` if the configured directive is invalid.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| LoginKitError::Config(format!("Invalid log level '{}': {e}", config.level)))
}

/// Install the global subscriber
///
/// # Errors
/// Returns `LoginKitError::Config` for an invalid level, or
/// `LoginKitError::Internal` if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let registry = Registry::default().with(build_filter(config)?);

    let installed = match config.format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
    };
    installed.map_err(|e| LoginKitError::Internal(format!("Tracing already initialised: {e}")))?;

    tracing::debug!(level = %config.level, format = %config.format, "Tracing initialised");
    Ok(())
}
