//! OAuth2 refresh-grant exchange over HTTP
//!
//! Implements the core `TokenExchange` port against the identity provider's
//! token endpoint: `POST token_url` with a form-encoded `refresh_token`
//! grant. Error bodies are parsed both in the RFC 6749 shape
//! (`{"error": "...", "error_description": "..."}`) and in the nested shape
//! (`{"error": {"code": "...", "description": "..."}}`).

use std::time::Duration;

use async_trait::async_trait;
use loginkit_core::{TokenExchange, TokenExchangeError};
use loginkit_domain::constants::REFRESH_GRANT_TYPE;
use loginkit_domain::{IdentityConfig, LoginKitError, TokenGrant};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::http::HttpClient;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    OAuth { error: String, error_description: Option<String> },
    Nested { error: NestedError },
}

#[derive(Debug, Deserialize)]
struct NestedError {
    code: String,
    description: Option<String>,
}

/// Token exchange backed by the identity provider's token endpoint
#[derive(Debug, Clone)]
pub struct HttpTokenExchange {
    http: HttpClient,
    token_url: Url,
    client_id: String,
    redirect_uri: Option<String>,
}

impl HttpTokenExchange {
    /// # Errors
    ///
    /// Returns `LoginKitError::Config` when the token URL is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: &IdentityConfig) -> Result<Self, LoginKitError> {
        let token_url = Url::parse(&config.token_url).map_err(|err| {
            LoginKitError::Config(format!("Invalid token URL '{}': {err}", config.token_url))
        })?;

        // One refresh is one request; retries belong to the caller.
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .max_attempts(1)
            .build()?;

        Ok(Self {
            http,
            token_url,
            client_id: config.client_id.clone(),
            redirect_uri: config.redirect_uri.clone(),
        })
    }

    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    fn rejected(status: StatusCode, body: &str) -> TokenExchangeError {
        let (error, description) = match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody::OAuth { error, error_description }) => (error, error_description),
            Ok(ErrorBody::Nested { error }) => (error.code, error.description),
            Err(_) => (
                status.canonical_reason().unwrap_or("unknown_error").to_string(),
                (!body.is_empty()).then(|| body.to_string()),
            ),
        };
        TokenExchangeError::Rejected { status: status.as_u16(), error, description }
    }
}

#[async_trait]
impl TokenExchange for HttpTokenExchange {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, TokenExchangeError> {
        let mut form = vec![
            ("grant_type", REFRESH_GRANT_TYPE),
            ("client_id", self.client_id.as_str()),
            ("refresh_token", refresh_token),
        ];
        if let Some(redirect_uri) = &self.redirect_uri {
            form.push(("redirect_uri", redirect_uri.as_str()));
        }

        debug!(url = %self.token_url, "Requesting token refresh");
        let request = self.http.request(Method::POST, self.token_url.clone()).form(&form);
        let response = self.http.send(request).await.map_err(|err| match err {
            LoginKitError::Network(message) => TokenExchangeError::Network(message),
            other => TokenExchangeError::Network(other.to_string()),
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TokenExchangeError::Network(format!("Failed to read body: {err}")))?;

        if !status.is_success() {
            let err = Self::rejected(status, &body);
            warn!(status = status.as_u16(), error = %err, "Token endpoint rejected refresh");
            return Err(err);
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|err| TokenExchangeError::InvalidResponse(err.to_string()))?;
        if parsed.access_token.is_empty() {
            return Err(TokenExchangeError::InvalidResponse("empty access_token".into()));
        }

        info!(
            expires_in = ?parsed.expires_in,
            rotated = parsed.refresh_token.is_some(),
            "Token refresh succeeded"
        );
        Ok(TokenGrant {
            access_token: parsed.access_token,
            refresh_token: parsed.refresh_token,
            expires_in: parsed.expires_in,
        })
    }
}
