//! Secret storage primitives
//!
//! [`SecretStore`] is the minimal key/value contract the session repositories
//! build on. [`KeychainProvider`] backs it with the platform keychain; tests
//! use `testing::MockKeychainProvider`.

pub mod keychain;

pub use keychain::{KeychainError, KeychainProvider, SecretStore};
