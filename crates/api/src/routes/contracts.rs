//! Route definitions for `/contracts`, including the settlements and délais
//! listed under a contract.

use axum::routing::get;
use axum::Router;

use crate::handlers::{contracts, delais, settlements};
use crate::state::AppState;

/// ```text
/// GET    /                       -> list_contracts (?search, status, service, sort)
/// POST   /                       -> create_contract
/// GET    /alerts                 -> list_alerts
/// GET    /{id}                   -> get_contract
/// PUT    /{id}                   -> update_contract
/// DELETE /{id}                   -> delete_contract
/// GET    /{id}/settlements       -> list_settlements
/// POST   /{id}/settlements       -> create_settlement
/// GET    /{id}/delais            -> list_delais
/// POST   /{id}/delais            -> create_delai
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(contracts::list_contracts).post(contracts::create_contract),
        )
        .route("/alerts", get(contracts::list_alerts))
        .route(
            "/{id}",
            get(contracts::get_contract)
                .put(contracts::update_contract)
                .delete(contracts::delete_contract),
        )
        .route(
            "/{id}/settlements",
            get(settlements::list_settlements).post(settlements::create_settlement),
        )
        .route(
            "/{id}/delais",
            get(delais::list_delais).post(delais::create_delai),
        )
}
