//! Macro for implementing Display and FromStr for configuration enums
//!
//! Configuration values arrive as strings from environment variables and
//! config files; this macro gives each enum a single lowercase spelling and
//! case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use loginkit_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Stable,
//!     Beta,
//! }
//!
//! impl_domain_status_conversions!(Channel {
//!     Stable => "stable",
//!     Beta => "beta",
//! });
//!
//! assert_eq!("BETA".parse::<Channel>().unwrap(), Channel::Beta);
//! ```

/// Implements Display and FromStr traits for string-backed enums
///
/// - Display writes the lowercase spelling
/// - FromStr accepts any casing and reports the enum name on failure
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
