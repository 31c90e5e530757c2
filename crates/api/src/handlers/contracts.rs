//! Handlers for the `/contracts` resource.
//!
//! Every read is enriched with the derived schedule and payment fields,
//! computed from the contract and all of its settlements for today's date.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use marches_core::error::CoreError;
use marches_core::filtering::{filter_and_sort, sort_items, SortKey};
use marches_core::status::ContractStatus;
use marches_core::types::DbId;
use marches_db::models::contract::{Contract, ContractWithMetrics, CreateContract, UpdateContract};
use marches_db::repositories::{ContractRepo, SettlementRepo};
use marches_db::DbPool;
use rust_decimal::Decimal;

use super::{check_label, require_text, today};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireManager};
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Contract",
        id,
    })
}

fn check_terms(initial_amount: Option<Decimal>, duration_days: Option<i32>) -> AppResult<()> {
    if initial_amount.is_some_and(|a| a.is_sign_negative()) {
        return Err(AppError::BadRequest(
            "Le montant initial ne peut pas être négatif".into(),
        ));
    }
    if duration_days.is_some_and(|d| d < 0) {
        return Err(AppError::BadRequest(
            "La durée d'exécution ne peut pas être négative".into(),
        ));
    }
    Ok(())
}

/// Attach derived fields to a batch of contracts with one settlement query.
pub(crate) async fn enrich_all(
    pool: &DbPool,
    contracts: Vec<Contract>,
) -> AppResult<Vec<ContractWithMetrics>> {
    let mut amounts = SettlementRepo::amounts_by_contract(pool).await?;
    let today = today();
    Ok(contracts
        .into_iter()
        .map(|c| {
            let paid = amounts.remove(&c.id).unwrap_or_default();
            ContractWithMetrics::evaluate(c, paid, today)
        })
        .collect())
}

async fn enrich_one(pool: &DbPool, contract: Contract) -> AppResult<ContractWithMetrics> {
    let settlements = SettlementRepo::list_by_contract(pool, contract.id).await?;
    Ok(ContractWithMetrics::evaluate(
        contract,
        settlements.into_iter().map(|s| s.amount),
        today(),
    ))
}

/// Keep the contracts that need attention, nearest deadline first.
pub fn alerts(contracts: Vec<ContractWithMetrics>) -> Vec<ContractWithMetrics> {
    let mut flagged: Vec<_> = contracts
        .into_iter()
        .filter(|c| c.metrics.is_overdue || c.metrics.is_near_deadline)
        .collect();
    sort_items(&mut flagged, SortKey::Deadline);
    flagged
}

/// GET /api/contracts?search=&status=&service=&sort=
pub async fn list_contracts(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let sort = params.sort_key()?;
    let contracts = ContractRepo::list(&state.pool).await?;
    let enriched = enrich_all(&state.pool, contracts).await?;
    Ok(Json(DataResponse::new(filter_and_sort(
        enriched,
        &params.filter(),
        sort,
    ))))
}

/// GET /api/contracts/alerts
///
/// Active contracts past their deadline or within the warning window.
pub async fn list_alerts(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let active = ContractRepo::list_active(&state.pool).await?;
    let enriched = enrich_all(&state.pool, active).await?;
    Ok(Json(DataResponse::new(alerts(enriched))))
}

/// POST /api/contracts
pub async fn create_contract(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateContract>,
) -> AppResult<impl IntoResponse> {
    require_text(&input.number, "Le numéro du contrat")?;
    require_text(&input.subject, "L'objet du contrat")?;
    check_label::<ContractStatus>(input.status.as_deref())?;
    check_terms(Some(input.initial_amount), input.duration_days)?;

    let contract = ContractRepo::create(&state.pool, Some(user.user_id), &input).await?;
    tracing::info!(user_id = %user.user_id, contract_id = %contract.id, number = %contract.number, "Contract created");

    let enriched = ContractWithMetrics::evaluate(contract, [], today());
    Ok((StatusCode::CREATED, Json(DataResponse::new(enriched))))
}

/// GET /api/contracts/{id}
pub async fn get_contract(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let contract = ContractRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(enrich_one(&state.pool, contract).await?)))
}

/// PUT /api/contracts/{id}
pub async fn update_contract(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContract>,
) -> AppResult<impl IntoResponse> {
    check_label::<ContractStatus>(input.status.as_deref())?;
    check_terms(input.initial_amount, input.duration_days)?;

    let contract = ContractRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(user_id = %user.user_id, contract_id = %id, status = %contract.status, "Contract updated");

    Ok(Json(DataResponse::new(enrich_one(&state.pool, contract).await?)))
}

/// DELETE /api/contracts/{id}
///
/// Rejected with 400 while settlements or délais still reference it.
pub async fn delete_contract(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ContractRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(user_id = %admin.user_id, contract_id = %id, "Contract deleted");
    Ok(Json(DataResponse::new(serde_json::json!({ "id": id }))))
}
