//! Bearer-authenticated API client
//!
//! Every request obtains its token from the [`TokenDependentQueue`], so
//! concurrent calls share one token fetch. Responses that reject the token
//! are reported through [`AuthorizationFailureSink`]:
//! - `401`, or any response whose error code is `invalid_token`, reports
//!   `AuthorizationFailure::InvalidToken`
//! - other `403` responses report `AuthorizationFailure::Other`

use std::sync::Arc;
use std::time::Duration;

use loginkit_core::{AuthorizationFailureSink, TokenDependentQueue};
use loginkit_domain::AuthorizationFailure;
use reqwest::header::WWW_AUTHENTICATE;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::errors::ApiError;
use crate::http::HttpClient;

const INVALID_TOKEN_CODE: &str = "invalid_token";

/// Configuration for [`AuthorizedClient`]
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL for API (e.g., "https://login.xsolla.com/api")
    pub base_url: String,
    /// Timeout for API requests
    pub timeout: Duration,
    /// Total attempts per request (initial try + retries)
    pub max_attempts: usize,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://login.xsolla.com/api".to_string(),
            timeout: Duration::from_secs(30),
            max_attempts: 3,
        }
    }
}

/// API client that authenticates through the session
pub struct AuthorizedClient {
    http: HttpClient,
    config: ApiClientConfig,
    tokens: TokenDependentQueue,
    failures: Arc<dyn AuthorizationFailureSink>,
}

impl AuthorizedClient {
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the HTTP client cannot be built.
    pub fn new(
        config: ApiClientConfig,
        tokens: TokenDependentQueue,
        failures: Arc<dyn AuthorizationFailureSink>,
    ) -> Result<Self, ApiError> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .max_attempts(config.max_attempts)
            .build()?;

        Ok(Self { http, config, tokens, failures })
    }

    /// Execute a GET request
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Session` when no token is available, `ApiError::Auth`
    /// when the server rejects it, and the status category otherwise.
    #[instrument(skip(self), fields(path = %path))]
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(Method::GET, path, None).await?;
        let result = Self::parse(response).await?;
        info!("GET request successful");
        Ok(result)
    }

    /// Execute a POST request with a JSON body
    ///
    /// # Errors
    ///
    /// See [`Self::get`]; also fails if the body cannot be serialized.
    #[instrument(skip(self, body), fields(path = %path))]
    pub async fn post<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Client(format!("Failed to serialize body: {e}")))?;
        let response = self.execute(Method::POST, path, Some(body)).await?;
        let result = Self::parse(response).await?;
        info!("POST request successful");
        Ok(result)
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response, ApiError> {
        let token = self.tokens.acquire().await?;
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        debug!(%method, url = %url, "Authorized request");

        let mut request = self.http.request(method, &url).bearer_auth(token);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = self.http.send(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let challenge = response
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.unwrap_or_default();
        Err(self.status_error(status, &url, challenge.as_deref(), &body))
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if status == StatusCode::NO_CONTENT || status == StatusCode::RESET_CONTENT {
            return serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ApiError::Client(format!(
                    "No content response ({}), but response type cannot be deserialized \
                     from empty body",
                    status.as_u16()
                ))
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Client(format!("Failed to parse response: {e}")))
    }

    fn status_error(
        &self,
        status: StatusCode,
        url: &str,
        challenge: Option<&str>,
        body: &str,
    ) -> ApiError {
        let message = if body.is_empty() {
            format!("{url} returned status {status}")
        } else {
            format!("{url} returned status {status}: {body}")
        };

        if let Some(failure) = classify_authorization_failure(status, challenge, body) {
            warn!(status = status.as_u16(), failure = ?failure, "Authorization failure");
            self.failures.report_authorization_failure(failure);
            return ApiError::Auth(message);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            ApiError::RateLimit(message)
        } else if status.is_server_error() {
            ApiError::Server(message)
        } else {
            ApiError::Client(message)
        }
    }
}

/// Decide whether a failed response is an authorization failure
fn classify_authorization_failure(
    status: StatusCode,
    challenge: Option<&str>,
    body: &str,
) -> Option<AuthorizationFailure> {
    let invalid_token = status == StatusCode::UNAUTHORIZED
        || challenge.is_some_and(|value| value.contains(INVALID_TOKEN_CODE))
        || error_code(body).as_deref() == Some(INVALID_TOKEN_CODE);

    if invalid_token {
        Some(AuthorizationFailure::InvalidToken)
    } else if status == StatusCode::FORBIDDEN {
        Some(AuthorizationFailure::Other)
    } else {
        None
    }
}

/// Error code from either `{"error": "code"}` or `{"error": {"code": "code"}}`
fn error_code(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        serde_json::Value::String(code) => Some(code.clone()),
        serde_json::Value::Object(error) => error.get("code")?.as_str().map(str::to_string),
        _ => None,
    }
}

impl std::fmt::Debug for AuthorizedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizedClient")
            .field("config", &self.config)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}
