//! Authorized API client
//!
//! Sends bearer-authenticated requests with tokens obtained through the
//! token-dependent queue, and reports authorization failures back to the
//! session so that a rejected token logs the user out.

pub mod client;
pub mod errors;

pub use client::{ApiClientConfig, AuthorizedClient};
pub use errors::{ApiError, ApiErrorCategory};
