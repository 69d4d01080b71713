use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Trait for wall-clock reads to enable testing
pub trait Clock: Send + Sync + 'static {
    /// Current wall-clock time in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock implementation for production use
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Implement Clock for Arc<T> where T: Clock for convenient cloning
impl<T: Clock> Clock for Arc<T> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
