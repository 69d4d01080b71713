//! Testing utilities and helpers
//!
//! - **[`async_utils`]**: eventual-consistency assertions for async tests
//! - **[`mocks`]**: in-memory replacements for platform integrations
//! - **[`time`]**: controllable wall clock
//!
//! ## Usage
//!
//! ```rust
//! use loginkit_common::testing::MockClock;
//! use loginkit_common::Clock;
//!
//! let clock = MockClock::new();
//! let start = clock.now();
//! clock.advance_secs(5);
//! assert_eq!((clock.now() - start).num_seconds(), 5);
//! ```

pub mod async_utils;
#[cfg(feature = "platform")]
pub mod mocks;
pub mod time;

pub use async_utils::timeout_ok;
#[cfg(feature = "platform")]
pub use mocks::MockKeychainProvider;
pub use time::MockClock;
