//! Authorization failures reported by API adapters

use serde::{Deserialize, Serialize};

/// Classification of an authorization failure seen on an API call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationFailure {
    /// The server rejected the access token itself
    InvalidToken,
    /// Any other authorization failure
    Other,
}
