//! Modular common utilities shared across LoginKit crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error classification, clock abstraction
//! - `runtime`: async-aware helpers and testing utilities
//! - `platform`: platform integrations (keychain-backed secret storage)
//! - `observability`: optional tracing (not included by default)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "foundation")]
pub mod time;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod security;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(feature = "test-utils")]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use error::{ErrorClassification, ErrorSeverity};
#[cfg(feature = "platform")]
pub use security::{KeychainError, KeychainProvider, SecretStore};
#[cfg(feature = "foundation")]
pub use time::{Clock, SystemClock};
