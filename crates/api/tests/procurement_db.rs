//! Procurement routes over a migrated database: CRUD, derived contract
//! fields from stored settlements, alerts, reports, and constraint errors.

mod common;

use axum::body::Body;
use axum::http::{Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;

use common::{body_json, db_app, seed_profile, TestApp};
use marches_core::export::CSV_HEADER;
use marches_core::roles::Role;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Decimal fields serialize as strings; compare them numerically.
fn number(value: &Value) -> f64 {
    match value {
        Value::String(s) => s.parse().unwrap(),
        other => other.as_f64().unwrap(),
    }
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn created(response: Response<Body>) -> Value {
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn create_contract(app: &TestApp, token: &str, number: &str, status: &str) -> Value {
    created(
        app.post(
            "/api/contracts",
            Some(token),
            json!({
                "number": number,
                "subject": "Réhabilitation du canal principal",
                "awardee": "Atlas BTP",
                "initial_amount": "100000.00",
                "start_date": "2024-01-01",
                "duration_days": 180,
                "status": status,
                "service": "SEHA",
            }),
        )
        .await,
    )
    .await
}

async fn add_settlement(app: &TestApp, token: &str, contract_id: &str, number: &str, amount: &str) {
    created(
        app.post(
            &format!("/api/contracts/{contract_id}/settlements"),
            Some(token),
            json!({ "number": number, "amount": amount }),
        )
        .await,
    )
    .await;
}

// ---------------------------------------------------------------------------
// Markets
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn market_lifecycle(pool: PgPool) {
    let (_, manager) = seed_profile(&pool, "chef@ormvao.ma", Role::Manager).await;
    let (_, admin) = seed_profile(&pool, "direction@ormvao.ma", Role::Admin).await;
    let (_, agent) = seed_profile(&pool, "agent@ormvao.ma", Role::Agent).await;
    let app = db_app(pool, None);

    let market = created(
        app.post(
            "/api/markets",
            Some(&manager),
            json!({
                "number": "AO-01/2024",
                "object": "Curage des canaux secondaires",
                "service": "SEHA",
                "estimated_amount": "250000.00",
            }),
        )
        .await,
    )
    .await;
    assert_eq!(market["status"], "draft");
    let id = market["id"].as_str().unwrap().to_string();

    let listed = body_json(app.get("/api/markets?search=curage", Some(&agent)).await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let none = body_json(app.get("/api/markets?status=completed", Some(&agent)).await).await;
    assert!(none["data"].as_array().unwrap().is_empty());

    let response = app
        .put(&format!("/api/markets/{id}"), Some(&manager), json!({"status": "published"}))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "published");

    let response = app.delete(&format!("/api/markets/{id}"), Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.get(&format!("/api/markets/{id}"), Some(&agent)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_market_number_is_a_conflict(pool: PgPool) {
    let (_, manager) = seed_profile(&pool, "chef@ormvao.ma", Role::Manager).await;
    let app = db_app(pool, None);
    let body = json!({"number": "AO-02/2024", "object": "Pompage"});

    created(app.post("/api/markets", Some(&manager), body.clone()).await).await;
    let response = app.post("/api/markets", Some(&manager), body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn contract_reads_carry_fields_derived_from_settlements(pool: PgPool) {
    let (_, manager) = seed_profile(&pool, "chef@ormvao.ma", Role::Manager).await;
    let app = db_app(pool, None);

    let contract = create_contract(&app, &manager, "C-01/2024", "active").await;
    let id = contract["id"].as_str().unwrap().to_string();
    add_settlement(&app, &manager, &id, "D-1", "25000.00").await;
    add_settlement(&app, &manager, &id, "D-2", "15000.00").await;

    let detail = body_json(app.get(&format!("/api/contracts/{id}"), Some(&manager)).await).await;
    let data = &detail["data"];
    assert_eq!(data["number"], "C-01/2024");
    assert_eq!(data["deadline_date"], "2024-06-29");
    assert_eq!(data["is_overdue"], true);
    assert_eq!(data["remaining_days"], 0);
    assert_eq!(data["payment_status"], "partial");
    assert_eq!(number(&data["total_paid"]), 40000.0);
    assert_eq!(number(&data["remaining_amount"]), 60000.0);
    assert_eq!(number(&data["payment_percent"]), 40.0);

    // The list view goes through the grouped settlement query.
    let listed = body_json(app.get("/api/contracts", Some(&manager)).await).await;
    let rows = listed["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(number(&rows[0]["total_paid"]), 40000.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn filters_and_alerts_only_keep_matching_contracts(pool: PgPool) {
    let (_, manager) = seed_profile(&pool, "chef@ormvao.ma", Role::Manager).await;
    let app = db_app(pool, None);

    create_contract(&app, &manager, "C-02/2024", "active").await;
    create_contract(&app, &manager, "C-03/2024", "draft").await;

    let active = body_json(app.get("/api/contracts?status=active", Some(&manager)).await).await;
    let rows = active["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["number"], "C-02/2024");

    let all = body_json(app.get("/api/contracts?status=all&sort=amount", Some(&manager)).await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 2);

    // A draft contract is never overdue, whatever its dates.
    let alerts = body_json(app.get("/api/contracts/alerts", Some(&manager)).await).await;
    let flagged = alerts["data"].as_array().unwrap();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0]["number"], "C-02/2024");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn contract_with_settlements_cannot_be_deleted(pool: PgPool) {
    let (_, manager) = seed_profile(&pool, "chef@ormvao.ma", Role::Manager).await;
    let (_, admin) = seed_profile(&pool, "direction@ormvao.ma", Role::Admin).await;
    let app = db_app(pool, None);

    let contract = create_contract(&app, &manager, "C-04/2024", "active").await;
    let id = contract["id"].as_str().unwrap().to_string();
    add_settlement(&app, &manager, &id, "D-1", "1000.00").await;

    let response = app.delete(&format!("/api/contracts/{id}"), Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "FOREIGN_KEY_VIOLATION");

    let response = app.get(&format!("/api/contracts/{id}"), Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn settlement_on_unknown_contract_is_not_found(pool: PgPool) {
    let (_, manager) = seed_profile(&pool, "chef@ormvao.ma", Role::Manager).await;
    let app = db_app(pool, None);

    let response = app
        .post(
            "/api/contracts/0b6f8c2e-9d3a-4c55-8e71-2f0f1d7f4a10/settlements",
            Some(&manager),
            json!({"number": "D-1", "amount": "10.00"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Délais and expenses
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delais_and_expenses_round_trip(pool: PgPool) {
    let (_, manager) = seed_profile(&pool, "chef@ormvao.ma", Role::Manager).await;
    let (_, admin) = seed_profile(&pool, "direction@ormvao.ma", Role::Admin).await;
    let app = db_app(pool, None);

    let contract = create_contract(&app, &manager, "C-05/2024", "active").await;
    let id = contract["id"].as_str().unwrap().to_string();

    let delai = created(
        app.post(
            &format!("/api/contracts/{id}/delais"),
            Some(&manager),
            json!({
                "delai_type": "extension",
                "start_date": "2024-06-30",
                "end_date": "2024-07-30",
                "reason": "Intempéries",
            }),
        )
        .await,
    )
    .await;
    let delai_id = delai["id"].as_str().unwrap().to_string();

    let response = app
        .put(&format!("/api/delais/{delai_id}"), Some(&manager), json!({"status": "active"}))
        .await;
    assert_eq!(body_json(response).await["data"]["status"], "active");

    let listed = body_json(app.get(&format!("/api/contracts/{id}/delais"), Some(&manager)).await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    let expense = created(
        app.post(
            "/api/expenses",
            Some(&manager),
            json!({"amount": "1200.50", "expense_date": "2024-03-05", "category": "Carburant"}),
        )
        .await,
    )
    .await;
    assert_eq!(expense["status"], "pending");
    let expense_id = expense["id"].as_str().unwrap().to_string();

    let response = app.delete(&format!("/api/expenses/{expense_id}"), Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(app.get("/api/expenses", Some(&manager)).await).await;
    assert!(listed["data"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn summary_and_csv_export_reflect_stored_rows(pool: PgPool) {
    let (_, manager) = seed_profile(&pool, "chef@ormvao.ma", Role::Manager).await;
    let (_, agent) = seed_profile(&pool, "agent@ormvao.ma", Role::Agent).await;
    let app = db_app(pool, None);

    created(
        app.post(
            "/api/markets",
            Some(&manager),
            json!({"number": "AO-09/2024", "object": "Pompage", "estimated_amount": "50000.00"}),
        )
        .await,
    )
    .await;
    let contract = create_contract(&app, &manager, "C-09/2024", "active").await;
    let id = contract["id"].as_str().unwrap().to_string();
    add_settlement(&app, &manager, &id, "D-1", "40000.00").await;

    let summary = body_json(app.get("/api/reports/summary", Some(&agent)).await).await;
    let kpis = &summary["data"]["kpis"];
    assert_eq!(kpis["total_markets"], 1);
    assert_eq!(kpis["total_contracts"], 1);
    assert_eq!(kpis["active_contracts"], 1);
    assert_eq!(kpis["overdue_contracts"], 1);
    assert_eq!(kpis["pending_settlements"], 1);
    assert_eq!(number(&kpis["total_paid"]), 40000.0);
    assert_eq!(number(&kpis["total_value"]), 100000.0);

    let response = app.get("/api/reports/export?format=csv", Some(&agent)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()["content-disposition"].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"rapport-"));

    let csv = body_text(response).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], CSV_HEADER);
    // One market, one contract, one settlement.
    assert_eq!(lines.len(), 4);
    assert!(lines.iter().any(|l| l.starts_with("Contrat,100000.00,2024-01-01,active")));
}
