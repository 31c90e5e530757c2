//! Handlers for the `/markets` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use marches_core::error::CoreError;
use marches_core::filtering::filter_and_sort;
use marches_core::status::MarketStatus;
use marches_core::timeouts::{race_timeout, MARKET_CREATE_TIMEOUT, MARKET_CREATE_TIMEOUT_MESSAGE};
use marches_core::types::DbId;
use marches_db::models::market::{CreateMarket, UpdateMarket};
use marches_db::repositories::MarketRepo;
use rust_decimal::Decimal;

use super::{check_label, require_text};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireManager};
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Market",
        id,
    })
}

fn check_amount(amount: Option<Decimal>) -> AppResult<()> {
    if amount.is_some_and(|a| a.is_sign_negative()) {
        return Err(AppError::BadRequest(
            "Le montant estimé ne peut pas être négatif".into(),
        ));
    }
    Ok(())
}

/// GET /api/markets?search=&status=&service=&sort=
pub async fn list_markets(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let sort = params.sort_key()?;
    let markets = MarketRepo::list(&state.pool).await?;
    let markets = filter_and_sort(markets, &params.filter(), sort);
    Ok(Json(DataResponse::new(markets)))
}

/// POST /api/markets
///
/// Raced against a fixed deadline; on expiry the insert is abandoned and
/// the caller gets a 504 with a "took too long" message.
pub async fn create_market(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateMarket>,
) -> AppResult<impl IntoResponse> {
    require_text(&input.number, "Le numéro du marché")?;
    require_text(&input.object, "L'objet du marché")?;
    check_label::<MarketStatus>(input.status.as_deref())?;
    check_amount(input.estimated_amount)?;

    let market = race_timeout(
        async {
            MarketRepo::create(&state.pool, Some(user.user_id), &input)
                .await
                .map_err(AppError::from)
        },
        MARKET_CREATE_TIMEOUT,
        MARKET_CREATE_TIMEOUT_MESSAGE,
    )
    .await?;

    tracing::info!(user_id = %user.user_id, market_id = %market.id, number = %market.number, "Market created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(market))))
}

/// GET /api/markets/{id}
pub async fn get_market(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let market = MarketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse::new(market)))
}

/// PUT /api/markets/{id}
pub async fn update_market(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMarket>,
) -> AppResult<impl IntoResponse> {
    check_label::<MarketStatus>(input.status.as_deref())?;
    check_amount(input.estimated_amount)?;

    let market = MarketRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(user_id = %user.user_id, market_id = %id, "Market updated");
    Ok(Json(DataResponse::new(market)))
}

/// DELETE /api/markets/{id}
pub async fn delete_market(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !MarketRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(user_id = %admin.user_id, market_id = %id, "Market deleted");
    Ok(Json(DataResponse::new(serde_json::json!({ "id": id }))))
}
