//! Privileged account management with the service-role key.
//!
//! Only ever constructed server-side.

use async_trait::async_trait;
use marches_core::error::CoreError;
use marches_core::provisioning::{AuthAccounts, NewAccount};
use marches_core::types::DbId;

use crate::client::GoTrueClient;
use crate::config::BackendConfig;
use crate::error::AuthApiError;
use crate::wire::AuthUser;

#[derive(Clone)]
pub struct AdminClient {
    client: reqwest::Client,
    base_url: String,
    service_role_key: String,
}

impl AdminClient {
    pub fn new(base_url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_role_key: service_role_key.into(),
        }
    }

    /// `None` without a URL and a service-role key.
    pub fn from_config(config: &BackendConfig) -> Option<Self> {
        match (&config.url, &config.service_role_key) {
            (Some(url), Some(key)) => Some(Self::new(url.clone(), key.clone())),
            _ => None,
        }
    }

    fn users_url(&self) -> String {
        format!("{}/auth/v1/admin/users", self.base_url)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    /// `POST /auth/v1/admin/users` -- create a confirmed account.
    pub async fn create_user(&self, account: &NewAccount) -> Result<AuthUser, AuthApiError> {
        let body = serde_json::json!({
            "email": account.email.trim(),
            "password": account.password,
            "email_confirm": true,
            "user_metadata": {
                "role": account.role.as_str(),
                "full_name": account.full_name,
            },
        });
        let response = self
            .authorized(self.client.post(self.users_url()))
            .json(&body)
            .send()
            .await?;
        GoTrueClient::parse_response(response).await
    }

    /// `DELETE /auth/v1/admin/users/{id}`
    pub async fn delete_user(&self, user_id: DbId) -> Result<(), AuthApiError> {
        let response = self
            .authorized(self.client.delete(format!("{}/{user_id}", self.users_url())))
            .send()
            .await?;
        GoTrueClient::check_status(response).await
    }

    /// `PUT /auth/v1/admin/users/{id}` with a new password.
    pub async fn set_password(&self, user_id: DbId, password: &str) -> Result<(), AuthApiError> {
        let body = serde_json::json!({ "password": password });
        let response = self
            .authorized(self.client.put(format!("{}/{user_id}", self.users_url())))
            .json(&body)
            .send()
            .await?;
        GoTrueClient::check_status(response).await
    }
}

#[async_trait]
impl AuthAccounts for AdminClient {
    async fn create_account(&self, account: &NewAccount) -> Result<DbId, CoreError> {
        let user = self.create_user(account).await.map_err(|e| match e.status() {
            Some(422) if e.to_string().contains("already") => {
                CoreError::Conflict("Un compte existe déjà pour cet email".into())
            }
            _ => CoreError::from(e),
        })?;
        tracing::info!(user_id = %user.id, "Auth account created");
        Ok(user.id)
    }

    async fn delete_account(&self, user_id: DbId) -> Result<(), CoreError> {
        self.delete_user(user_id).await.map_err(CoreError::from)
    }

    async fn update_password(&self, user_id: DbId, password: &str) -> Result<(), CoreError> {
        self.set_password(user_id, password)
            .await
            .map_err(CoreError::from)
    }
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
