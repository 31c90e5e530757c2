use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::expenses;
use crate::state::AppState;

/// ```text
/// GET    /                   -> list_expenses
/// POST   /                   -> create_expense
/// DELETE /{id}               -> delete_expense
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(expenses::list_expenses).post(expenses::create_expense),
        )
        .route("/{id}", delete(expenses::delete_expense))
}
