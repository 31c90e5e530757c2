//! User administration: validation, unconfigured admin key, and the
//! compensating delete of the provisioning saga.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{body_json, build_test_app, secret_only, token_for, FakeAccounts, FakeProfiles};
use marches_core::provisioning::AuthAccounts;
use marches_core::types::DbId;

fn admin_profiles(admin: DbId) -> FakeProfiles {
    FakeProfiles {
        roles: [(admin, "admin".to_string())].into_iter().collect(),
        failing: Vec::new(),
    }
}

#[tokio::test]
async fn short_password_is_rejected_before_any_call() {
    let admin = DbId::new_v4();
    let accounts = Arc::new(FakeAccounts::new());
    let app = build_test_app(
        secret_only(),
        admin_profiles(admin),
        Some(accounts.clone() as Arc<dyn AuthAccounts>),
    );
    let token = token_for(admin, "direction@ormvao.ma", None);

    let response = app
        .post(
            "/api/users",
            Some(&token),
            json!({"email": "new@ormvao.ma", "password": "123", "role": "agent"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(accounts.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_role_is_rejected() {
    let admin = DbId::new_v4();
    let app = build_test_app(secret_only(), admin_profiles(admin), None);
    let token = token_for(admin, "direction@ormvao.ma", None);

    let response = app
        .post(
            "/api/users",
            Some(&token),
            json!({"email": "new@ormvao.ma", "password": "secret123", "role": "root"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn creation_needs_the_service_role_key() {
    let admin = DbId::new_v4();
    let app = build_test_app(secret_only(), admin_profiles(admin), None);
    let token = token_for(admin, "direction@ormvao.ma", None);

    let response = app
        .post(
            "/api/users",
            Some(&token),
            json!({"email": "new@ormvao.ma", "password": "secret123"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "BACKEND_UNCONFIGURED");
}

#[tokio::test]
async fn failed_profile_insert_deletes_the_new_account() {
    let admin = DbId::new_v4();
    let accounts = Arc::new(FakeAccounts::new());
    let app = build_test_app(
        secret_only(),
        admin_profiles(admin),
        Some(accounts.clone() as Arc<dyn AuthAccounts>),
    );
    let token = token_for(admin, "direction@ormvao.ma", None);

    // The profile insert hits the unreachable database.
    let response = app
        .post(
            "/api/users",
            Some(&token),
            json!({"email": "new@ormvao.ma", "password": "secret123", "role": "manager"}),
        )
        .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(*accounts.created.lock().unwrap(), vec!["new@ormvao.ma".to_string()]);
    assert_eq!(*accounts.deleted.lock().unwrap(), vec![accounts.created_id]);
}

#[tokio::test]
async fn admins_cannot_delete_themselves() {
    let admin = DbId::new_v4();
    let app = build_test_app(secret_only(), admin_profiles(admin), None);
    let token = token_for(admin, "direction@ormvao.ma", None);

    let response = app
        .request(Method::DELETE, &format!("/api/users/{admin}"), Some(&token), None)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
