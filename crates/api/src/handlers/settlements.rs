//! Handlers for settlements (décomptes): listed and created under their
//! contract, updated and deleted by id.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use marches_core::error::CoreError;
use marches_core::status::SettlementStatus;
use marches_core::types::DbId;
use marches_db::models::settlement::{CreateSettlement, UpdateSettlement};
use marches_db::repositories::{ContractRepo, SettlementRepo};
use marches_db::DbPool;
use rust_decimal::Decimal;

use super::{check_label, require_text};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

fn check_amount(amount: Option<Decimal>) -> AppResult<()> {
    if amount.is_some_and(|a| a <= Decimal::ZERO) {
        return Err(AppError::BadRequest(
            "Le montant du décompte doit être positif".into(),
        ));
    }
    Ok(())
}

pub(crate) async fn ensure_contract(pool: &DbPool, contract_id: DbId) -> AppResult<()> {
    if !ContractRepo::exists(pool, contract_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Contract",
            id: contract_id,
        }));
    }
    Ok(())
}

/// GET /api/contracts/{id}/settlements
pub async fn list_settlements(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(contract_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_contract(&state.pool, contract_id).await?;
    let settlements = SettlementRepo::list_by_contract(&state.pool, contract_id).await?;
    Ok(Json(DataResponse::new(settlements)))
}

/// POST /api/contracts/{id}/settlements
pub async fn create_settlement(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(contract_id): Path<DbId>,
    Json(input): Json<CreateSettlement>,
) -> AppResult<impl IntoResponse> {
    require_text(&input.number, "Le numéro du décompte")?;
    check_label::<SettlementStatus>(input.status.as_deref())?;
    check_amount(Some(input.amount))?;
    ensure_contract(&state.pool, contract_id).await?;

    let settlement = SettlementRepo::create(&state.pool, contract_id, &input).await?;
    tracing::info!(
        user_id = %user.user_id,
        contract_id = %contract_id,
        settlement_id = %settlement.id,
        amount = %settlement.amount,
        "Settlement created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(settlement))))
}

/// PUT /api/settlements/{id}
///
/// Also used to validate or reject a settlement through its status.
pub async fn update_settlement(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSettlement>,
) -> AppResult<impl IntoResponse> {
    check_label::<SettlementStatus>(input.status.as_deref())?;
    check_amount(input.amount)?;

    let settlement = SettlementRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Settlement",
                id,
            })
        })?;
    tracing::info!(user_id = %user.user_id, settlement_id = %id, status = %settlement.status, "Settlement updated");
    Ok(Json(DataResponse::new(settlement)))
}

/// DELETE /api/settlements/{id}
pub async fn delete_settlement(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !SettlementRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Settlement",
            id,
        }));
    }
    tracing::info!(user_id = %admin.user_id, settlement_id = %id, "Settlement deleted");
    Ok(Json(DataResponse::new(serde_json::json!({ "id": id }))))
}
