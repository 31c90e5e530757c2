//! Handlers for the `/auth` resource (login, refresh, logout, me).
//!
//! Credentials are checked by the hosted auth service; this server only
//! relays the session and attaches the resolved user.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use marches_auth::AuthApiError;
use marches_core::error::CoreError;
use marches_core::identity::{ResolvedUser, Session};
use marches_core::types::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Tokens plus the resolved user, returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<Timestamp>,
    pub user: ResolvedUser,
}

async fn session_response(state: &AppState, session: Session) -> SessionResponse {
    let role = state.resolver.resolve_role(&session.identity).await;
    let user = ResolvedUser::new(&session.identity, role);
    SessionResponse {
        access_token: session.access_token,
        refresh_token: session.refresh_token,
        expires_at: session.expires_at,
        user,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let email = input.email.trim();
    if email.is_empty() || input.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email et mot de passe sont requis".into(),
        ));
    }

    let session = state
        .auth_client()?
        .sign_in_with_password(email, &input.password)
        .await
        .map_err(AuthApiError::into_credentials_error)?;

    let response = session_response(&state, session).await;
    tracing::info!(user_id = %response.user.id, role = %response.user.role, "User signed in");

    Ok(Json(DataResponse::new(response)))
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshRequest>,
) -> AppResult<impl IntoResponse> {
    let session = state
        .auth_client()?
        .refresh_session(&input.refresh_token)
        .await
        .map_err(AuthApiError::into_credentials_error)?;

    Ok(Json(DataResponse::new(
        session_response(&state, session).await,
    )))
}

/// POST /api/auth/logout
///
/// Revokes the refresh tokens of the caller's session.
pub async fn logout(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state
        .auth_client()?
        .sign_out(&auth.access_token)
        .await
        .map_err(CoreError::from)?;

    tracing::info!(user_id = %auth.user_id, "User signed out");
    Ok(Json(DataResponse::new(serde_json::json!({ "signed_out": true }))))
}

/// GET /api/auth/me
pub async fn me(auth: AuthUser) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse::new(auth.to_resolved())))
}
