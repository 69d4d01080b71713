//! # LoginKit Core
//!
//! Session lifecycle logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - The session store and its persistence/notification ports
//! - The token access coordinator (lazy, single-flight refresh)
//! - The token-dependent queue that coalesces concurrent token requests
//! - The `SessionService` facade used by applications
//!
//! ## Architecture Principles
//! - Only depends on `loginkit-common` and `loginkit-domain`
//! - No storage, HTTP, or platform code
//! - All external dependencies via traits
//! - Drivers run on the Tokio runtime of the caller

pub mod service;
pub mod session;
pub mod token;

// Re-export specific items to avoid ambiguity
pub use service::SessionService;
pub use session::ports::{AuthorizationFailureSink, SessionListener, SessionRepository};
pub use session::SessionStore;
pub use token::ports::{TokenExchange, TokenExchangeError};
pub use token::{TokenAccessCoordinator, TokenDependentQueue, TokenDependentTask};
