//! REST client for the public auth endpoints (anonymous key).

use marches_core::identity::{Identity, Session};
use serde::de::DeserializeOwned;

use crate::config::BackendConfig;
use crate::error::AuthApiError;
use crate::wire::{AuthUser, TokenResponse};

/// HTTP client for `/auth/v1` with the anonymous key.
#[derive(Clone)]
pub struct GoTrueClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl GoTrueClient {
    /// `base_url` is the project URL, e.g. `https://xyz.supabase.co`.
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, anon_key)
    }

    /// Reuse an existing [`reqwest::Client`] (shared connection pool).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    /// `None` when either public value is missing.
    pub fn from_config(config: &BackendConfig) -> Option<Self> {
        match (&config.url, &config.anon_key) {
            (Some(url), Some(key)) => Some(Self::new(url.clone(), key.clone())),
            _ => None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// `POST /auth/v1/token?grant_type=password`
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .client
            .post(format!("{}/auth/v1/token?grant_type=password", self.base_url))
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?;

        let token: TokenResponse = Self::parse_response(response).await?;
        tracing::debug!(user_id = %token.user.id, "Password sign-in succeeded");
        Ok(token.into_session())
    }

    /// `POST /auth/v1/token?grant_type=refresh_token`
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AuthApiError> {
        let body = serde_json::json!({ "refresh_token": refresh_token });
        let response = self
            .client
            .post(format!("{}/auth/v1/token?grant_type=refresh_token", self.base_url))
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?;

        let token: TokenResponse = Self::parse_response(response).await?;
        Ok(token.into_session())
    }

    /// `POST /auth/v1/logout` -- revokes the refresh tokens of the session.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthApiError> {
        let response = self
            .client
            .post(format!("{}/auth/v1/logout", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// `GET /auth/v1/user` -- the identity behind an access token.
    pub async fn get_user(&self, access_token: &str) -> Result<Identity, AuthApiError> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let user: AuthUser = Self::parse_response(response).await?;
        Ok(user.identity())
    }

    // ---- private helpers ----

    pub(crate) async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AuthApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AuthApiError::from_body(status.as_u16(), &body));
        }
        Ok(response)
    }

    pub(crate) async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AuthApiError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| AuthApiError::Decode(e.to_string()))
    }

    pub(crate) async fn check_status(response: reqwest::Response) -> Result<(), AuthApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

impl std::fmt::Debug for GoTrueClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoTrueClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
