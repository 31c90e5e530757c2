use axum::routing::put;
use axum::Router;

use crate::handlers::delais;
use crate::state::AppState;

/// ```text
/// PUT    /{id}               -> update_delai
/// DELETE /{id}               -> delete_delai
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        put(delais::update_delai).delete(delais::delete_delai),
    )
}
