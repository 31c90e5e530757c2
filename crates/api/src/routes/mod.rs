pub mod auth;
pub mod contracts;
pub mod delais;
pub mod expenses;
pub mod health;
pub mod markets;
pub mod reports;
pub mod settlements;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
/// /auth/me                             resolved user (requires auth)
///
/// /users                               list, create (admin only)
/// /users/{id}                          update, delete (admin only)
///
/// /markets                             list, create
/// /markets/{id}                        get, update, delete
///
/// /contracts                           list (enriched), create
/// /contracts/alerts                    overdue and near-deadline contracts
/// /contracts/{id}                      get, update, delete
/// /contracts/{id}/settlements          list, create
/// /contracts/{id}/delais               list, create
///
/// /settlements/{id}                    update, delete
/// /delais/{id}                         update, delete
///
/// /expenses                            list, create
/// /expenses/{id}                       delete
///
/// /reports/summary                     KPIs, performance, breakdowns
/// /reports/export                      json or csv attachment
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/markets", markets::router())
        .nest("/contracts", contracts::router())
        .nest("/settlements", settlements::router())
        .nest("/delais", delais::router())
        .nest("/expenses", expenses::router())
        .nest("/reports", reports::router())
}
