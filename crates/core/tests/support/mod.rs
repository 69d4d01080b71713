//! Shared test helpers for `loginkit-core` integration tests.
//!
//! These helpers provide in-memory ports and a scripted token exchange so
//! that the tests can focus on session behaviour instead of wiring.

#![allow(dead_code)]

pub mod exchange;
pub mod repositories;

use std::sync::Arc;

use chrono::Duration;
use loginkit_common::testing::MockClock;
use loginkit_common::Clock;
use loginkit_core::{SessionListener, SessionService, SessionStore};
use loginkit_domain::SessionError;
use parking_lot::Mutex;

pub use exchange::MockTokenExchange;
pub use repositories::MemorySessionRepository;

/// Listener that records every invalidation reason it receives.
#[derive(Default)]
pub struct RecordingListener {
    events: Mutex<Vec<Option<SessionError>>>,
}

impl RecordingListener {
    pub fn events(&self) -> Vec<Option<SessionError>> {
        self.events.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().len()
    }
}

impl SessionListener for RecordingListener {
    fn session_invalidated(&self, reason: Option<SessionError>) {
        self.events.lock().push(reason);
    }
}

/// Fully wired service over in-memory ports.
pub struct Harness {
    pub clock: MockClock,
    pub repository: Arc<MemorySessionRepository>,
    pub exchange: Arc<MockTokenExchange>,
    pub listener: Arc<RecordingListener>,
    pub store: Arc<SessionStore>,
    pub service: SessionService,
    // Keeps the weakly registered listener alive.
    _listener_handle: Arc<dyn SessionListener>,
}

impl Harness {
    pub fn new(exchange: MockTokenExchange) -> Self {
        let clock = MockClock::new();
        let repository = Arc::new(MemorySessionRepository::default());
        let exchange = Arc::new(exchange);
        let store = Arc::new(
            SessionStore::open(repository.clone(), Arc::new(clock.clone()))
                .expect("in-memory repository never fails"),
        );
        let service = SessionService::new(store.clone(), exchange.clone());

        let listener = Arc::new(RecordingListener::default());
        let listener_handle: Arc<dyn SessionListener> = listener.clone();
        service.set_listener(&listener_handle);

        Self {
            clock,
            repository,
            exchange,
            listener,
            store,
            service,
            _listener_handle: listener_handle,
        }
    }

    /// Log in with a token that expires `secs` seconds from now.
    pub fn login_expiring_in(&self, access: &str, refresh: Option<&str>, secs: i64) {
        self.service.login(
            access,
            refresh.map(str::to_string),
            Some(self.clock.now() + Duration::seconds(secs)),
        );
    }
}
