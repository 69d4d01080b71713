//! Scripted `TokenExchange` for core tests
//!
//! Responses are popped in order; an empty script answers with a network
//! error, and a scripted panic unwinds out of the exchange. An optional gate
//! holds every exchange until the test releases it, which keeps a refresh in
//! flight while concurrent callers pile up.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use loginkit_core::{TokenExchange, TokenExchangeError};
use loginkit_domain::TokenGrant;
use parking_lot::Mutex;
use tokio::sync::Notify;

enum Step {
    Respond(Result<TokenGrant, TokenExchangeError>),
    Panic,
}

#[derive(Default)]
pub struct MockTokenExchange {
    script: Mutex<VecDeque<Step>>,
    received: Mutex<Vec<String>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl MockTokenExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful grant.
    pub fn with_grant(self, access: &str, refresh: Option<&str>, expires_in: Option<i64>) -> Self {
        self.script.lock().push_back(Step::Respond(Ok(TokenGrant {
            access_token: access.to_string(),
            refresh_token: refresh.map(str::to_string),
            expires_in,
        })));
        self
    }

    /// Queue a rejected exchange.
    pub fn with_rejection(self, error: &str) -> Self {
        self.script.lock().push_back(Step::Respond(Err(TokenExchangeError::Rejected {
            status: 400,
            error: error.to_string(),
            description: None,
        })));
        self
    }

    /// Queue an exchange that panics.
    pub fn with_panic(self) -> Self {
        self.script.lock().push_back(Step::Panic);
        self
    }

    /// Hold every exchange until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Refresh tokens passed to the exchange, in call order.
    pub fn received(&self) -> Vec<String> {
        self.received.lock().clone()
    }
}

#[async_trait]
impl TokenExchange for MockTokenExchange {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, TokenExchangeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().push(refresh_token.to_string());

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let step = self.script.lock().pop_front();
        match step {
            Some(Step::Respond(response)) => response,
            Some(Step::Panic) => panic!("scripted exchange panic"),
            None => Err(TokenExchangeError::Network("script exhausted".to_string())),
        }
    }
}
