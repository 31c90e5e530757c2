//! Integration tests against an in-process fake of the auth service.

use std::collections::HashMap;
use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use marches_auth::{AdminClient, AuthSession, GoTrueClient, RestProfileLookup};
use marches_core::error::CoreError;
use marches_core::identity::SessionEvent;
use marches_core::provisioning::{AuthAccounts, NewAccount};
use marches_core::role_resolver::{ProfileLookup, ProfileLookupError, RoleResolver};
use marches_core::roles::Role;
use marches_core::session::{SessionPhase, SessionService, SessionSource};
use marches_core::types::DbId;

const USER_ID: &str = "6f1c1b2e-3c1e-4c1a-9f43-0d1f6f0b8a11";

// ---------------------------------------------------------------------------
// Fake service
// ---------------------------------------------------------------------------

fn token_body(access_token: &str) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "refresh-1",
        "user": {
            "id": USER_ID,
            "email": "k.amrani@ormvao.ma",
            "user_metadata": {},
            "app_metadata": {"role": "manager"}
        }
    })
}

async fn token(
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    match params.get("grant_type").map(String::as_str) {
        Some("password") if body["password"] == "secret" => {
            (StatusCode::OK, Json(token_body("access-1")))
        }
        Some("refresh_token") if body["refresh_token"] == "refresh-1" => {
            (StatusCode::OK, Json(token_body("access-2")))
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })),
        ),
    }
}

async fn user(headers: HeaderMap) -> impl IntoResponse {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "Bearer access-1");
    if authorized {
        (StatusCode::OK, Json(token_body("access-1")["user"].clone()))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"code": 401, "msg": "invalid JWT"})),
        )
    }
}

async fn create_admin_user(Json(body): Json<Value>) -> impl IntoResponse {
    if body["email"] == "taken@ormvao.ma" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"code": 422, "msg": "A user with this email address has already been registered"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "id": USER_ID,
            "email": body["email"],
            "user_metadata": body["user_metadata"],
        })),
    )
}

async fn admin_user_by_id(Path(id): Path<String>) -> impl IntoResponse {
    if id == USER_ID {
        (StatusCode::OK, Json(json!({})))
    } else {
        (StatusCode::NOT_FOUND, Json(json!({"msg": "User not found"})))
    }
}

async fn profiles(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    if params.get("id").map(String::as_str) == Some(format!("eq.{USER_ID}").as_str()) {
        (StatusCode::OK, Json(json!({"role": "admin"})))
    } else {
        (
            StatusCode::NOT_ACCEPTABLE,
            Json(json!({
                "code": "PGRST116",
                "details": "The result contains 0 rows",
                "message": "JSON object requested, multiple (or no) rows returned"
            })),
        )
    }
}

/// Start the fake on an ephemeral port and return its base URL.
async fn spawn_fake() -> String {
    let app = Router::new()
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/logout", post(|| async { StatusCode::NO_CONTENT }))
        .route("/auth/v1/user", get(user))
        .route("/auth/v1/admin/users", post(create_admin_user))
        .route(
            "/auth/v1/admin/users/{id}",
            put(admin_user_by_id).delete(admin_user_by_id),
        )
        .route("/rest/v1/user_profiles", get(profiles));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn account(email: &str) -> NewAccount {
    NewAccount {
        email: email.into(),
        password: "secret123".into(),
        role: Role::Agent,
        full_name: None,
        service: None,
        phone: None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn password_sign_in_returns_session_with_metadata_role() {
    let client = GoTrueClient::new(spawn_fake().await, "anon");

    let session = client
        .sign_in_with_password("k.amrani@ormvao.ma", "secret")
        .await
        .unwrap();

    assert_eq!(session.access_token, "access-1");
    assert_eq!(session.identity.id.to_string(), USER_ID);
    assert_eq!(session.identity.metadata_role.as_deref(), Some("manager"));
    assert!(session.expires_at.is_some());
}

#[tokio::test]
async fn bad_credentials_map_to_unauthorized() {
    let auth = AuthSession::new(GoTrueClient::new(spawn_fake().await, "anon"));

    let err = auth.sign_in("k.amrani@ormvao.ma", "wrong").await.unwrap_err();

    assert_matches!(err, CoreError::Unauthorized(_));
    assert!(auth.current_session().await.unwrap().is_none());
}

#[tokio::test]
async fn get_user_requires_valid_token() {
    let client = GoTrueClient::new(spawn_fake().await, "anon");

    let identity = client.get_user("access-1").await.unwrap();
    assert_eq!(identity.email.as_deref(), Some("k.amrani@ormvao.ma"));

    let err = client.get_user("forged").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn session_changes_are_broadcast() {
    let auth = AuthSession::new(GoTrueClient::new(spawn_fake().await, "anon"));
    let mut events = auth.subscribe();

    auth.sign_in("k.amrani@ormvao.ma", "secret").await.unwrap();
    assert_matches!(events.recv().await.unwrap(), SessionEvent::SignedIn(_));

    let refreshed = auth.refresh().await.unwrap();
    assert_eq!(refreshed.access_token, "access-2");
    assert_matches!(events.recv().await.unwrap(), SessionEvent::TokenRefreshed(_));

    auth.sign_out().await.unwrap();
    assert_matches!(events.recv().await.unwrap(), SessionEvent::SignedOut);
    assert!(auth.current_session().await.unwrap().is_none());
}

#[tokio::test]
async fn session_service_follows_auth_session() {
    let base = spawn_fake().await;
    let client = GoTrueClient::new(base, "anon");
    let auth = Arc::new(AuthSession::new(client.clone()));
    let lookup: Arc<dyn ProfileLookup> = Arc::new(RestProfileLookup::new(&client));
    let service = SessionService::new(
        Some(auth.clone() as Arc<dyn SessionSource>),
        RoleResolver::new(Some(lookup)),
    );

    let snapshot = service.init().await;
    assert_eq!(snapshot.phase, SessionPhase::Ready);
    assert!(snapshot.user.is_none());

    let mut rx = service.watch();
    rx.borrow_and_update();
    auth.sign_in("k.amrani@ormvao.ma", "secret").await.unwrap();
    rx.changed().await.unwrap();

    let user = rx.borrow().user.clone().unwrap();
    assert_eq!(user.role, Role::Admin);
    assert_eq!(user.name, "k.amrani");

    service.dispose().await;
}

#[tokio::test]
async fn rest_lookup_maps_missing_row_to_not_found() {
    let client = GoTrueClient::new(spawn_fake().await, "anon");
    let lookup = RestProfileLookup::new(&client).with_access_token("access-1");

    let known: DbId = USER_ID.parse().unwrap();
    assert_eq!(lookup.find_role(known).await, Ok(Some("admin".to_string())));
    assert_eq!(
        lookup.find_role(DbId::new_v4()).await,
        Err(ProfileLookupError::NotFound)
    );
}

#[tokio::test]
async fn admin_client_creates_updates_and_deletes_accounts() {
    let admin = AdminClient::new(spawn_fake().await, "service");

    let id = admin.create_account(&account("new@ormvao.ma")).await.unwrap();
    assert_eq!(id.to_string(), USER_ID);

    admin.update_password(id, "another-secret").await.unwrap();
    admin.delete_account(id).await.unwrap();

    let missing = admin.delete_account(DbId::new_v4()).await.unwrap_err();
    assert_matches!(missing, CoreError::Upstream(_));
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let admin = AdminClient::new(spawn_fake().await, "service");

    let err = admin.create_account(&account("taken@ormvao.ma")).await.unwrap_err();

    assert_matches!(err, CoreError::Conflict(_));
}
