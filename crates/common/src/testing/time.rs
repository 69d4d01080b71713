//! Controllable wall clock for deterministic expiry tests

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::time::Clock;

/// Mock clock that only moves when told to
///
/// Clones share the same underlying time, so a test can keep one handle
/// while the component under test owns another.
#[derive(Debug, Clone)]
pub struct MockClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Create a mock clock frozen at the current wall-clock time
    #[must_use]
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Create a mock clock frozen at `start`
    #[must_use]
    pub fn at(start: DateTime<Utc>) -> Self {
        Self { current: Arc::new(Mutex::new(start)) }
    }

    /// Advance the clock by a duration
    pub fn advance(&self, duration: Duration) {
        *self.current.lock() += duration;
    }

    /// Advance the clock by whole seconds
    pub fn advance_secs(&self, seconds: i64) {
        self.advance(Duration::seconds(seconds));
    }

    /// Jump to an absolute time
    pub fn set(&self, now: DateTime<Utc>) {
        *self.current.lock() = now;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}
