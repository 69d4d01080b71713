//! # LoginKit API
//!
//! Application layer - composition root and demo entry point.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Session status reporting and the logging session listener
//! - The `loginkit` demo binary
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture once at start-up

pub mod context;
pub mod utils;

pub use context::AppContext;
pub use utils::logging::LoggingSessionListener;
pub use utils::status::SessionStatus;
