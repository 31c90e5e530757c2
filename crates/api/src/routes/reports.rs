use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// ```text
/// GET    /summary            -> summary
/// GET    /export             -> export (?format=json|csv)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(reports::summary))
        .route("/export", get(reports::export))
}
