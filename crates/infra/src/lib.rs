//! # LoginKit Infrastructure
//!
//! Infrastructure implementations of core session ports.
//!
//! This crate contains:
//! - Session storage backends (memory, keychain, JSON file)
//! - The OAuth2 refresh-grant token exchange
//! - An authorized API client that reports token rejections
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `loginkit-core`
//! - Depends on `loginkit-common`, `loginkit-domain` and `loginkit-core`
//! - Contains all "impure" code (I/O, HTTP, platform keychain)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod identity;
pub mod observability;
pub mod storage;

// Re-export commonly used items
pub use api::{ApiClientConfig, ApiError, AuthorizedClient};
pub use errors::InfraError;
pub use http::HttpClient;
pub use identity::HttpTokenExchange;
pub use observability::init_tracing;
pub use storage::{
    build_repository, FileSessionRepository, KeychainSessionRepository, MemorySessionRepository,
};
