//! Handlers for the `/users` resource (admin only).
//!
//! An application user spans two systems: the auth account on the hosted
//! service and the row in `user_profiles`. Creation runs the provisioning
//! saga so that a failed profile insert does not leave an orphan account.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use marches_core::error::CoreError;
use marches_core::provisioning::{NewAccount, ProvisioningSaga, MIN_PASSWORD_LENGTH};
use marches_core::roles::Role;
use marches_core::types::DbId;
use marches_db::models::user_profile::UpdateUserProfile;
use marches_db::profiles::PgProfileStore;
use marches_db::repositories::UserProfileRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Delay before the single background retry of a failed compensating delete.
const COMPENSATION_RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    /// Defaults to `agent`.
    pub role: Option<String>,
    pub full_name: Option<String>,
    pub service: Option<String>,
    pub phone: Option<String>,
}

fn profile_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "UserProfile",
        id,
    })
}

fn parse_role(raw: Option<&str>) -> AppResult<Role> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Role::Agent),
        Some(label) => label.parse().map_err(AppError::Core),
    }
}

/// GET /api/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let users = UserProfileRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(users)))
}

/// POST /api/users
///
/// Create the auth account, then the profile. On profile failure the
/// account is deleted again; the caller sees the profile error.
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    let account = NewAccount {
        email: input.email.trim().to_string(),
        password: input.password,
        role: parse_role(input.role.as_deref())?,
        full_name: input.full_name,
        service: input.service,
        phone: input.phone,
    };
    account.validate()?;

    let accounts = state.accounts()?;
    let store = Arc::new(PgProfileStore::new(state.pool.clone()));
    let mut saga = ProvisioningSaga::new(accounts, store);

    let result = saga.run(&account).await;
    tracing::info!(
        admin_id = %admin.user_id,
        email = %account.email,
        state = ?saga.state(),
        history = ?saga.history(),
        "Provisioning saga finished"
    );

    if saga.compensation_pending() {
        tokio::spawn(async move {
            tokio::time::sleep(COMPENSATION_RETRY_DELAY).await;
            if saga.retry_compensation().await.is_err() {
                tracing::warn!(
                    user_id = ?saga.user_id(),
                    "Orphan auth account left behind; delete it manually"
                );
            }
        });
    }

    let profile = result?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(profile))))
}

/// PUT /api/users/{id}
///
/// Updates the profile, and the auth password only when a new one is given.
/// The password goes first: once it has changed, a failed profile write is
/// reported as a partial update.
pub async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserProfile>,
) -> AppResult<impl IntoResponse> {
    let role = match input.role.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(label) => Some(label.parse::<Role>()?),
    };

    let new_password = input.password.clone().filter(|p| !p.is_empty());
    if let Some(password) = &new_password {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Le mot de passe doit contenir au moins {MIN_PASSWORD_LENGTH} caractères"
            ))));
        }
    }

    if UserProfileRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(profile_not_found(id));
    }

    if let Some(password) = &new_password {
        state.accounts()?.update_password(id, password).await?;
        tracing::info!(admin_id = %admin.user_id, user_id = %id, "User password updated");
    }

    let changes = UpdateUserProfile {
        role: role.map(|r| r.as_str().to_string()),
        password: None,
        ..input
    };
    let profile = match UserProfileRepo::update(&state.pool, id, &changes).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return Err(profile_not_found(id)),
        Err(e) if new_password.is_some() => {
            tracing::error!(user_id = %id, error = %e, "Profile update failed after password change");
            return Err(AppError::PartialUpdate(
                "Le mot de passe a été modifié, mais la mise à jour du profil a échoué".into(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(admin_id = %admin.user_id, user_id = %id, "User profile updated");
    Ok(Json(DataResponse::new(profile)))
}

/// DELETE /api/users/{id}
///
/// Deletes the profile, then the auth account on a best-effort basis.
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if admin.user_id == id {
        return Err(AppError::BadRequest(
            "Vous ne pouvez pas supprimer votre propre compte".into(),
        ));
    }

    if !UserProfileRepo::delete(&state.pool, id).await? {
        return Err(profile_not_found(id));
    }

    match state.accounts() {
        Ok(accounts) => {
            if let Err(e) = accounts.delete_account(id).await {
                tracing::warn!(user_id = %id, error = %e, "Auth account delete failed after profile removal");
            }
        }
        Err(_) => {
            tracing::warn!(user_id = %id, "Auth account not deleted: user administration unconfigured");
        }
    }

    tracing::info!(admin_id = %admin.user_id, user_id = %id, "User deleted");
    Ok(Json(DataResponse::new(serde_json::json!({ "id": id }))))
}
