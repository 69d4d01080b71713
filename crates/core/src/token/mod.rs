//! Access-token acquisition: lazy refresh and request coalescing

pub mod coordinator;
pub mod ports;
pub mod queue;

pub use coordinator::TokenAccessCoordinator;
pub use queue::{TokenDependentQueue, TokenDependentTask};
