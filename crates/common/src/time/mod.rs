//! Wall-clock abstraction
//!
//! Session expiry is compared against "now" on every read, so components
//! take a [`Clock`] instead of calling `Utc::now()` directly. Tests swap in
//! `testing::MockClock` to move time without sleeping.

pub mod clock;

pub use clock::{Clock, SystemClock};
