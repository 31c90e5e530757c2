//! Role lookup through the REST (PostgREST) endpoint of the hosted backend.
//!
//! Used by clients that have no database connection of their own. A single
//! object is requested; when no row matches, the service answers with the
//! `PGRST116` code, which is the explicit "no row" signal of the resolver.

use async_trait::async_trait;
use marches_core::role_resolver::{ProfileLookup, ProfileLookupError};
use marches_core::types::DbId;

use crate::client::GoTrueClient;
use crate::wire::{PostgrestError, ProfileRoleRow};

/// Error code reported when a single-object request matched no row.
pub const NO_ROW_CODE: &str = "PGRST116";

#[derive(Clone)]
pub struct RestProfileLookup {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    /// Bearer token of the signed-in user; row-level security applies.
    access_token: Option<String>,
}

impl RestProfileLookup {
    pub fn new(auth: &GoTrueClient) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: auth.base_url().to_string(),
            anon_key: auth.anon_key().to_string(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

/// Interpret a response status and body.
pub fn interpret_response(
    status: u16,
    body: &str,
) -> Result<Option<String>, ProfileLookupError> {
    if (200..300).contains(&status) {
        return serde_json::from_str::<ProfileRoleRow>(body)
            .map(|row| row.role)
            .map_err(|e| ProfileLookupError::Failed(format!("malformed profile row: {e}")));
    }

    match serde_json::from_str::<PostgrestError>(body) {
        Ok(err) if err.code.as_deref() == Some(NO_ROW_CODE) => Err(ProfileLookupError::NotFound),
        Ok(err) => Err(ProfileLookupError::Failed(format!(
            "status {status}: {}",
            err.message.unwrap_or_default()
        ))),
        Err(_) => Err(ProfileLookupError::Failed(format!("status {status}"))),
    }
}

#[async_trait]
impl ProfileLookup for RestProfileLookup {
    async fn find_role(&self, user_id: DbId) -> Result<Option<String>, ProfileLookupError> {
        let token = self.access_token.as_deref().unwrap_or(&self.anon_key);
        let response = self
            .client
            .get(format!("{}/rest/v1/user_profiles", self.base_url))
            .query(&[("id", format!("eq.{user_id}")), ("select", "role".to_string())])
            .header("apikey", &self.anon_key)
            .header("Accept", "application/vnd.pgrst.object+json")
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ProfileLookupError::Failed(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ProfileLookupError::Failed(e.to_string()))?;
        interpret_response(status, &body)
    }
}
