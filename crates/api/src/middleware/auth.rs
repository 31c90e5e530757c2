//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use marches_core::error::CoreError;
use marches_core::identity::{Identity, ResolvedUser};
use marches_core::roles::Role;
use marches_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Signed-in user extracted from the `Authorization: Bearer` header.
///
/// The token is verified locally when the JWT secret is configured, and
/// otherwise by asking the auth service for its user. The role is then
/// resolved through the profile table.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub email: Option<String>,
    /// Display name (email local-part).
    pub name: String,
    pub role: Role,
    /// The raw access token, forwarded when acting on the user's behalf.
    pub access_token: String,
}

impl AuthUser {
    pub fn to_resolved(&self) -> ResolvedUser {
        ResolvedUser {
            id: self.user_id,
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
        }
    }
}

fn invalid_token() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
}

async fn verify(token: &str, state: &AppState) -> Result<Identity, AppError> {
    if let Some(secret) = state.config.backend.jwt_secret.as_deref() {
        return validate_token(token, secret)
            .map(|claims| claims.identity())
            .map_err(|_| invalid_token());
    }

    let client = state.auth_client()?;
    client.get_user(token).await.map_err(|e| match e.status() {
        Some(401) | Some(403) => invalid_token(),
        _ => AppError::Core(e.into()),
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let identity = verify(token, state).await?;
        let user = ResolvedUser::new(&identity, state.resolver.resolve_role(&identity).await);

        Ok(AuthUser {
            user_id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            access_token: token.to_string(),
        })
    }
}
