//! Wire shapes of the auth service responses.

use chrono::{TimeZone, Utc};
use marches_core::identity::{Identity, Session};
use marches_core::types::DbId;
use serde::Deserialize;

/// A user object as returned by `/auth/v1/user` and the admin endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: DbId,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
    #[serde(default)]
    pub app_metadata: serde_json::Value,
}

/// Role carried by provider metadata: `user_metadata.role`, then
/// `app_metadata.role`. Blank values are ignored.
pub fn metadata_role(
    user_metadata: &serde_json::Value,
    app_metadata: &serde_json::Value,
) -> Option<String> {
    [user_metadata, app_metadata].into_iter().find_map(|meta| {
        meta.get("role")
            .and_then(|r| r.as_str())
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
    })
}

impl AuthUser {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            email: self.email.clone(),
            metadata_role: metadata_role(&self.user_metadata, &self.app_metadata),
        }
    }
}

/// Body of a successful `/auth/v1/token` exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Lifetime in seconds.
    pub expires_in: Option<i64>,
    /// Absolute expiry, Unix seconds.
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl TokenResponse {
    pub fn into_session(self) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .or_else(|| {
                self.expires_in
                    .map(|secs| Utc::now() + chrono::Duration::seconds(secs))
            });

        Session {
            identity: self.user.identity(),
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
        }
    }
}

/// A row of `user_profiles` restricted to the role column.
#[derive(Debug, Deserialize)]
pub struct ProfileRoleRow {
    pub role: Option<String>,
}

/// PostgREST error body.
#[derive(Debug, Deserialize)]
pub struct PostgrestError {
    pub code: Option<String>,
    pub message: Option<String>,
}
