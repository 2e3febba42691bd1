//! Identity provider HTTP client implementation
//!
//! Talks to a GoTrue-style provider: password grant at
//! `/auth/v1/token?grant_type=password`, registration at
//! `/auth/v1/signup`, revocation at `/auth/v1/logout`.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::{AuthApi, AuthError, AuthSessionData, AuthUser};

/// Identity provider configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Base URL of the identity provider
    pub base_url: String,
    /// Public API key sent with every request
    pub anon_key: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("base_url", &self.base_url)
            .field("anon_key", &"[REDACTED]")
            .finish()
    }
}

impl AuthConfig {
    /// Create auth config from environment variables
    pub fn from_env() -> Result<Self, AuthError> {
        dotenvy::dotenv().ok();

        let base_url = std::env::var("AUTH_BASE_URL")
            .map_err(|_| AuthError::Configuration("AUTH_BASE_URL is required".to_string()))?;
        let anon_key = std::env::var("AUTH_ANON_KEY")
            .map_err(|_| AuthError::Configuration("AUTH_ANON_KEY is required".to_string()))?;

        Ok(Self { base_url, anon_key })
    }
}

/// Token payload returned by the password grant
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

/// HTTP client for the identity provider.
pub struct AuthClient {
    client: Client,
    config: AuthConfig,
}

impl AuthClient {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Pull the provider's human-readable message out of an error body.
    /// GoTrue is inconsistent across endpoints: the message may live in
    /// `error_description`, `msg`, or `error`.
    fn provider_message(body: &str) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        ["error_description", "msg", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(|v| v.as_str()))
            .map(str::to_string)
    }

    async fn rejection(response: reqwest::Response, fallback: &str) -> AuthError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        AuthError::Provider(
            Self::provider_message(&body).unwrap_or_else(|| format!("{} ({})", fallback, status)),
        )
    }
}

#[async_trait::async_trait]
impl AuthApi for AuthClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSessionData, AuthError> {
        let response = self
            .client
            .post(self.endpoint("/auth/v1/token?grant_type=password"))
            .header("apikey", &self.config.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::NetworkUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response, "Sign in failed").await);
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Response(format!("Failed to parse token response: {}", e)))?;

        Ok(AuthSessionData {
            access_token: token.access_token,
            user: token.user,
        })
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .client
            .post(self.endpoint("/auth/v1/signup"))
            .header("apikey", &self.config.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| AuthError::NetworkUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response, "Sign up failed").await);
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::Response(format!("Failed to parse signup response: {}", e)))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.endpoint("/auth/v1/logout"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AuthError::NetworkUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response, "Sign out failed").await);
        }

        Ok(())
    }
}
