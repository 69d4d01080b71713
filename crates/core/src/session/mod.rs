//! Persisted session state and invalidation

pub mod ports;
pub mod store;

pub use store::SessionStore;
