//! # LoginKit Domain
//!
//! Session and token types shared by every LoginKit crate.
//!
//! This crate contains:
//! - The persisted session triple and refresh grant types
//! - The session failure taxonomy and workspace `Result`
//! - Configuration structures
//! - Persistent key names
//!
//! ## Architecture
//! - Depends only on the foundation tier of `loginkit-common`
//! - No I/O, no async runtime
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
