use axum::routing::put;
use axum::Router;

use crate::handlers::settlements;
use crate::state::AppState;

/// ```text
/// PUT    /{id}               -> update_settlement
/// DELETE /{id}               -> delete_settlement
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        put(settlements::update_settlement).delete(settlements::delete_settlement),
    )
}
