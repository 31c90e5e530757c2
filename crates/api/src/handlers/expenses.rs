//! Handlers for the `/expenses` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use marches_core::error::CoreError;
use marches_core::status::ExpenseStatus;
use marches_core::types::DbId;
use marches_db::models::expense::CreateExpense;
use marches_db::repositories::ExpenseRepo;
use rust_decimal::Decimal;

use super::check_label;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/expenses
pub async fn list_expenses(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let expenses = ExpenseRepo::list(&state.pool).await?;
    Ok(Json(DataResponse::new(expenses)))
}

/// POST /api/expenses
///
/// The expense date defaults to today.
pub async fn create_expense(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateExpense>,
) -> AppResult<impl IntoResponse> {
    check_label::<ExpenseStatus>(input.status.as_deref())?;
    if input.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Le montant de la dépense doit être positif".into(),
        ));
    }

    let expense = ExpenseRepo::create(&state.pool, Some(user.user_id), &input).await?;
    tracing::info!(user_id = %user.user_id, expense_id = %expense.id, amount = %expense.amount, "Expense created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(expense))))
}

/// DELETE /api/expenses/{id}
pub async fn delete_expense(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ExpenseRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Expense",
            id,
        }));
    }
    tracing::info!(user_id = %admin.user_id, expense_id = %id, "Expense deleted");
    Ok(Json(DataResponse::new(serde_json::json!({ "id": id }))))
}
