mod common;

use axum::http::StatusCode;
use axum::{Router, routing::post};
use axum_test::TestServer;
use quotes_api::api::handlers::create_authentication_token_handler;
use quotes_api::utils::token_generator::is_valid_token_plaintext;
use serde_json::json;

use common::{TEST_PASSWORD, TestApp};

async fn server() -> TestServer {
    let app = TestApp::new();
    app.create_user("linus@example.com", true, &[]).await;

    let router = Router::new()
        .route(
            "/v1/tokens/authentication",
            post(create_authentication_token_handler),
        )
        .with_state(app.state.clone());

    TestServer::new(router).unwrap()
}

#[tokio::test]
async fn test_issue_authentication_token() {
    let server = server().await;

    let response = server
        .post("/v1/tokens/authentication")
        .json(&json!({ "email": "linus@example.com", "password": TEST_PASSWORD }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<serde_json::Value>();
    let token = json["authentication_token"]["token"].as_str().unwrap();

    assert!(is_valid_token_plaintext(token));
    assert!(json["authentication_token"]["expiry"].is_string());
}

#[tokio::test]
async fn test_wrong_password() {
    let server = server().await;

    let response = server
        .post("/v1/tokens/authentication")
        .json(&json!({ "email": "linus@example.com", "password": "wrong-password" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "invalid_credentials"
    );
}

#[tokio::test]
async fn test_unknown_email() {
    let server = server().await;

    let response = server
        .post("/v1/tokens/authentication")
        .json(&json!({ "email": "nobody@example.com", "password": TEST_PASSWORD }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_body() {
    let server = server().await;

    let response = server
        .post("/v1/tokens/authentication")
        .text("{not json")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
