//! Conversions from external infrastructure errors into domain errors.

use loginkit_common::security::KeychainError;
use loginkit_domain::LoginKitError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub LoginKitError);

impl From<InfraError> for LoginKitError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<LoginKitError> for InfraError {
    fn from(value: LoginKitError) -> Self {
        Self(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoLoginKitError {
    fn into_loginkit(self) -> LoginKitError;
}

/* -------------------------------------------------------------------------- */
/* KeychainError → LoginKitError */
/* -------------------------------------------------------------------------- */

impl IntoLoginKitError for KeychainError {
    fn into_loginkit(self) -> LoginKitError {
        match self {
            KeychainError::NotFound => LoginKitError::Storage("keychain entry not found".into()),
            KeychainError::AccessFailed(reason) => {
                LoginKitError::Storage(format!("unable to access keychain: {reason}"))
            }
            KeychainError::Keyring(err) => {
                LoginKitError::Storage(format!("keychain platform error: {err}"))
            }
        }
    }
}

impl From<KeychainError> for InfraError {
    fn from(value: KeychainError) -> Self {
        Self(value.into_loginkit())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → LoginKitError */
/* -------------------------------------------------------------------------- */

impl IntoLoginKitError for std::io::Error {
    fn into_loginkit(self) -> LoginKitError {
        LoginKitError::Storage(format!("{:?}: {self}", self.kind()))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        Self(value.into_loginkit())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → LoginKitError */
/* -------------------------------------------------------------------------- */

impl IntoLoginKitError for HttpError {
    fn into_loginkit(self) -> LoginKitError {
        if self.is_timeout() {
            return LoginKitError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return LoginKitError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return LoginKitError::Config(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => LoginKitError::Auth(message),
                _ => LoginKitError::Network(message),
            };
        }

        LoginKitError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_loginkit())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
