mod common;

use axum::http::StatusCode;
use axum::{
    Router,
    routing::{post, put},
};
use axum_test::TestServer;
use quotes_api::api::handlers::{activate_user_handler, register_user_handler};
use quotes_api::application::services::user_service::DEFAULT_PERMISSION;
use quotes_api::domain::entities::TokenScope;
use quotes_api::domain::repositories::PermissionRepository;
use serde_json::json;
use std::sync::Arc;

use common::{MemoryStore, RecordingMailer};

struct Harness {
    server: TestServer,
    store: Arc<MemoryStore>,
    mailer: Arc<RecordingMailer>,
}

fn harness() -> Harness {
    let store = MemoryStore::new();
    let mailer = Arc::new(RecordingMailer::default());
    let state = common::create_test_state(store.clone(), mailer.clone());
    let app = Router::new()
        .route("/v1/users", post(register_user_handler))
        .route("/v1/users/activated", put(activate_user_handler))
        .with_state(state);

    Harness {
        server: TestServer::new(app).unwrap(),
        store,
        mailer,
    }
}

fn activation_token(body: &str) -> String {
    let marker = "\"token\": \"";
    let start = body.find(marker).unwrap() + marker.len();
    body[start..start + 26].to_string()
}

#[tokio::test]
async fn test_register_user() {
    let h = harness();

    let response = h
        .server
        .post("/v1/users")
        .json(&json!({
            "username": "ada",
            "email": "ada@example.com",
            "password": "pa55word123"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<serde_json::Value>();
    let id = json["user"]["id"].as_i64().unwrap();

    assert_eq!(json["user"]["email"], "ada@example.com");
    assert_eq!(json["user"]["activated"], false);
    assert!(json["user"].get("password_hash").is_none());

    let permissions = h.store.get_all_for_user(id).await.unwrap();
    assert!(permissions.includes(DEFAULT_PERMISSION));
    assert_eq!(h.store.tokens_for(id, TokenScope::Activation), 1);

    let email = h.mailer.wait_for_email().await;
    assert_eq!(email.to, "ada@example.com");
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let h = harness();
    let body = json!({
        "username": "ada",
        "email": "ada@example.com",
        "password": "pa55word123"
    });

    h.server
        .post("/v1/users")
        .json(&body)
        .await
        .assert_status(StatusCode::CREATED);

    let response = h
        .server
        .post("/v1/users")
        .json(&json!({
            "username": "ada2",
            "email": "ADA@example.com",
            "password": "pa55word123"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let json = response.json::<serde_json::Value>();
    assert!(json["error"]["details"].get("email").is_some());
}

#[tokio::test]
async fn test_register_validation() {
    let h = harness();

    let response = h
        .server
        .post("/v1/users")
        .json(&json!({ "username": "", "email": "nope", "password": "short" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let details = &response.json::<serde_json::Value>()["error"]["details"];
    assert!(details.get("username").is_some());
    assert!(details.get("email").is_some());
    assert!(details.get("password").is_some());
}

#[tokio::test]
async fn test_activate_user_once() {
    let h = harness();

    h.server
        .post("/v1/users")
        .json(&json!({
            "username": "ada",
            "email": "ada@example.com",
            "password": "pa55word123"
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let email = h.mailer.wait_for_email().await;
    let token = activation_token(&email.body);

    let response = h
        .server
        .put("/v1/users/activated")
        .json(&json!({ "token": token }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["user"]["activated"], true);

    let id = json["user"]["id"].as_i64().unwrap();
    assert!(h.store.user(id).unwrap().activated);
    assert_eq!(h.store.tokens_for(id, TokenScope::Activation), 0);

    let again = h
        .server
        .put("/v1/users/activated")
        .json(&json!({ "token": token }))
        .await;
    again.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_activate_malformed_token() {
    let h = harness();

    let response = h
        .server
        .put("/v1/users/activated")
        .json(&json!({ "token": "not-a-token" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let json = response.json::<serde_json::Value>();
    assert!(json["error"]["details"].get("token").is_some());
}
