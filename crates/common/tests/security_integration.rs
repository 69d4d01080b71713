//! Integration tests for the security module
//!
//! Exercises the `SecretStore` contract through trait objects, the way the
//! session repositories consume it.

#![cfg(all(feature = "platform", feature = "test-utils"))]

use std::sync::Arc;

use loginkit_common::security::{KeychainError, KeychainProvider, SecretStore};
use loginkit_common::testing::MockKeychainProvider;

fn test_service_name() -> String {
    format!("LoginKitTest.{}", uuid::Uuid::new_v4())
}

/// Validates that a store shared behind `Arc<dyn SecretStore>` observes
/// writes made through another handle.
#[test]
fn test_secret_store_shared_across_handles() {
    let mock = MockKeychainProvider::new(test_service_name());
    let store: Arc<dyn SecretStore> = Arc::new(mock.clone());

    store.set_secret("accessToken", "A").unwrap();
    store.set_secret("refreshToken", "R").unwrap();

    assert_eq!(mock.get_secret("accessToken").unwrap(), "A");
    assert_eq!(mock.keys(), vec!["accessToken".to_string(), "refreshToken".to_string()]);
}

/// Validates that deleting a missing secret is idempotent and that absence
/// is reported as `NotFound`, never as an empty value.
#[test]
fn test_missing_secret_semantics() {
    let store = MockKeychainProvider::new(test_service_name());

    store.delete_secret("tokenExpireDate").unwrap();
    store.delete_secret("tokenExpireDate").unwrap();

    assert!(matches!(store.get_secret("tokenExpireDate"), Err(KeychainError::NotFound)));
    assert!(!store.secret_exists("tokenExpireDate"));
}

/// Validates that overwriting a secret replaces the previous value.
#[test]
fn test_overwrite_replaces_value() {
    let store = MockKeychainProvider::new(test_service_name());

    store.set_secret("accessToken", "first").unwrap();
    store.set_secret("accessToken", "second").unwrap();

    assert_eq!(store.get_secret("accessToken").unwrap(), "second");
}

/// Validates that the platform provider can be constructed and used as a
/// trait object without touching the keychain.
#[test]
fn test_keychain_provider_as_trait_object() {
    let provider = KeychainProvider::new("LoginKit.session");
    assert_eq!(provider.service_name(), "LoginKit.session");

    let _store: Arc<dyn SecretStore> = Arc::new(provider);
}
