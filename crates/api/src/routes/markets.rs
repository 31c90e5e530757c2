use axum::routing::get;
use axum::Router;

use crate::handlers::markets;
use crate::state::AppState;

/// ```text
/// GET    /                   -> list_markets (?search, status, service, sort)
/// POST   /                   -> create_market
/// GET    /{id}               -> get_market
/// PUT    /{id}               -> update_market
/// DELETE /{id}               -> delete_market
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(markets::list_markets).post(markets::create_market))
        .route(
            "/{id}",
            get(markets::get_market)
                .put(markets::update_market)
                .delete(markets::delete_market),
        )
}
