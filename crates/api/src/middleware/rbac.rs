//! Role gates layered on top of [`AuthUser`].
//!
//! Reading is open to every signed-in role. Writes need `manager` or
//! `admin`; deletions and account management need `admin`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use marches_core::error::CoreError;
use marches_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Resolve the caller, then check `allowed` against their role.
async fn gate(
    parts: &mut Parts,
    state: &AppState,
    allowed: fn(Role) -> bool,
    denial: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if allowed(user.role) {
        Ok(user)
    } else {
        tracing::debug!(user_id = %user.user_id, role = %user.role, "Role check failed");
        Err(CoreError::Forbidden(denial.to_string()).into())
    }
}

/// Deletion and user administration.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        gate(parts, state, Role::can_administer, "Admin role required")
            .await
            .map(Self)
    }
}

/// Creation and edits.
pub struct RequireManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        gate(parts, state, Role::can_edit, "Manager or Admin role required")
            .await
            .map(Self)
    }
}

/// Any signed-in role; used by the read routes.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        AuthUser::from_request_parts(parts, state).await.map(Self)
    }
}
