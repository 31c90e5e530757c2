//! Handlers for délais (deadline records): initial periods, extensions
//! and suspensions attached to a contract.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use marches_core::error::CoreError;
use marches_core::status::{DelaiStatus, DelaiType};
use marches_core::types::{Date, DbId};
use marches_db::models::delai::{CreateDelai, UpdateDelai};
use marches_db::repositories::DelaiRepo;

use super::check_label;
use super::settlements::ensure_contract;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

fn check_period(start: Option<Date>, end: Option<Date>) -> AppResult<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(AppError::BadRequest(
                "La date de fin précède la date de début".into(),
            ));
        }
    }
    Ok(())
}

/// GET /api/contracts/{id}/delais
pub async fn list_delais(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(contract_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_contract(&state.pool, contract_id).await?;
    let delais = DelaiRepo::list_by_contract(&state.pool, contract_id).await?;
    Ok(Json(DataResponse::new(delais)))
}

/// POST /api/contracts/{id}/delais
pub async fn create_delai(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(contract_id): Path<DbId>,
    Json(input): Json<CreateDelai>,
) -> AppResult<impl IntoResponse> {
    check_label::<DelaiType>(Some(input.delai_type.as_str()))?;
    check_label::<DelaiStatus>(input.status.as_deref())?;
    check_period(Some(input.start_date), input.end_date)?;
    ensure_contract(&state.pool, contract_id).await?;

    let delai = DelaiRepo::create(&state.pool, contract_id, &input).await?;
    tracing::info!(
        user_id = %user.user_id,
        contract_id = %contract_id,
        delai_id = %delai.id,
        delai_type = %delai.delai_type,
        "Délai created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(delai))))
}

/// PUT /api/delais/{id}
pub async fn update_delai(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDelai>,
) -> AppResult<impl IntoResponse> {
    check_label::<DelaiType>(input.delai_type.as_deref())?;
    check_label::<DelaiStatus>(input.status.as_deref())?;
    check_period(input.start_date, input.end_date)?;

    let delai = DelaiRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound { entity: "Delai", id }))?;
    tracing::info!(user_id = %user.user_id, delai_id = %id, "Délai updated");
    Ok(Json(DataResponse::new(delai)))
}

/// DELETE /api/delais/{id}
pub async fn delete_delai(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !DelaiRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Delai", id }));
    }
    tracing::info!(user_id = %admin.user_id, delai_id = %id, "Délai deleted");
    Ok(Json(DataResponse::new(serde_json::json!({ "id": id }))))
}
