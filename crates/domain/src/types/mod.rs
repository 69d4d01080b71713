//! Session data types

pub mod authorization;
pub mod grant;
pub mod session;

pub use authorization::AuthorizationFailure;
pub use grant::TokenGrant;
pub use session::{Session, TokenState};
