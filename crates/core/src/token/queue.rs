//! Token-dependent work queue
//!
//! Callers that need a token for a follow-up API call submit a task. While
//! a token fetch is in flight, new tasks only queue; when the fetch settles,
//! every queued task (including ones added during the fetch) receives the
//! same outcome in submission order.

use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use loginkit_domain::SessionError;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, error};

use super::coordinator::TokenAccessCoordinator;

/// One-shot callback waiting for an access token
pub type TokenDependentTask = Box<dyn FnOnce(Result<String, SessionError>) + Send + 'static>;

#[derive(Default)]
struct QueueState {
    busy: bool,
    tasks: VecDeque<TokenDependentTask>,
}

/// Coalesces concurrent token requests into a single fetch
#[derive(Clone)]
pub struct TokenDependentQueue {
    coordinator: TokenAccessCoordinator,
    state: Arc<Mutex<QueueState>>,
}

impl TokenDependentQueue {
    pub fn new(coordinator: TokenAccessCoordinator) -> Self {
        Self { coordinator, state: Arc::new(Mutex::new(QueueState::default())) }
    }

    /// Queue `task`, starting a token fetch if none is in flight
    ///
    /// Must be called inside a Tokio runtime; the fetch runs on a spawned
    /// task and invokes every queued callback from there.
    pub fn submit<F>(&self, task: F)
    where
        F: FnOnce(Result<String, SessionError>) + Send + 'static,
    {
        let start_fetch = {
            let mut state = self.state.lock();
            state.tasks.push_back(Box::new(task));
            !std::mem::replace(&mut state.busy, true)
        };

        if start_fetch {
            let queue = self.clone();
            tokio::spawn(async move { queue.drain().await });
        } else {
            debug!("Token fetch in flight, task queued");
        }
    }

    /// Queue a request and wait for its outcome
    ///
    /// # Errors
    ///
    /// Returns the shared fetch failure; see
    /// [`TokenAccessCoordinator::get_access_token`].
    pub async fn acquire(&self) -> Result<String, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.submit(move |outcome| {
            let _ = tx.send(outcome);
        });
        rx.await.unwrap_or(Err(SessionError::TokenUpdateFailure))
    }

    /// Number of tasks waiting for the current fetch
    pub fn pending(&self) -> usize {
        self.state.lock().tasks.len()
    }

    pub fn is_busy(&self) -> bool {
        self.state.lock().busy
    }

    async fn drain(self) {
        let outcome = AssertUnwindSafe(self.coordinator.get_access_token())
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                error!("Token fetch panicked");
                Err(SessionError::TokenUpdateFailure)
            });

        // Clearing busy and taking the queue together means a task submitted
        // afterwards always starts a fresh fetch.
        let tasks = {
            let mut state = self.state.lock();
            state.busy = false;
            std::mem::take(&mut state.tasks)
        };

        debug!(tasks = tasks.len(), ok = outcome.is_ok(), "Draining token-dependent tasks");
        for task in tasks {
            task(outcome.clone());
        }
    }
}

impl std::fmt::Debug for TokenDependentQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("TokenDependentQueue")
            .field("busy", &state.busy)
            .field("pending", &state.tasks.len())
            .finish()
    }
}
