mod common;

use axum::http::StatusCode;
use axum::{Router, routing::get};
use axum_test::TestServer;
use quotes_api::api::handlers::{
    create_quote_handler, delete_quote_handler, list_quotes_handler, show_quote_handler,
    update_quote_handler,
};
use serde_json::json;
use std::sync::Arc;

use common::{MemoryStore, RecordingMailer};

fn server() -> TestServer {
    let state = common::create_test_state(MemoryStore::new(), Arc::new(RecordingMailer::default()));
    let app = Router::new()
        .route(
            "/v1/quotes",
            get(list_quotes_handler).post(create_quote_handler),
        )
        .route(
            "/v1/quotes/{id}",
            get(show_quote_handler)
                .patch(update_quote_handler)
                .delete(delete_quote_handler),
        )
        .with_state(state);

    TestServer::new(app).unwrap()
}

async fn create(server: &TestServer, content: &str, author: &str) -> serde_json::Value {
    let response = server
        .post("/v1/quotes")
        .json(&json!({ "content": content, "author": author }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<serde_json::Value>()["quote"].clone()
}

#[tokio::test]
async fn test_create_quote_success() {
    let server = server();

    let response = server
        .post("/v1/quotes")
        .json(&json!({
            "content": "Programs must be written for people to read.",
            "author": "Abelson"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<serde_json::Value>();
    let id = json["quote"]["id"].as_i64().unwrap();

    assert_eq!(response.header("location"), format!("/v1/quotes/{id}"));
    assert_eq!(json["quote"]["author"], "Abelson");
    assert_eq!(json["quote"]["version"], 1);
}

#[tokio::test]
async fn test_create_quote_validation() {
    let server = server();

    let response = server
        .post("/v1/quotes")
        .json(&json!({ "content": "", "author": "a".repeat(26) }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(json["error"]["details"].get("content").is_some());
    assert!(json["error"]["details"].get("author").is_some());
}

#[tokio::test]
async fn test_create_quote_multibyte_text_over_byte_limit() {
    let server = server();

    let response = server
        .post("/v1/quotes")
        .json(&json!({ "content": "é".repeat(60), "author": "ü".repeat(20) }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let json = response.json::<serde_json::Value>();
    assert!(json["error"]["details"].get("content").is_some());
    assert!(json["error"]["details"].get("author").is_some());
}

#[tokio::test]
async fn test_create_quote_unknown_field_is_bad_request() {
    let server = server();

    let response = server
        .post("/v1/quotes")
        .json(&json!({ "content": "x", "author": "y", "rating": 5 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn test_show_quote() {
    let server = server();
    let quote = create(&server, "Less is more.", "Mies").await;

    let response = server
        .get(&format!("/v1/quotes/{}", quote["id"]))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["quote"], quote);
}

#[tokio::test]
async fn test_show_quote_not_found() {
    let server = server();

    for path in ["/v1/quotes/999", "/v1/quotes/0", "/v1/quotes/-3", "/v1/quotes/abc"] {
        let response = server.get(path).await;

        response.assert_status_not_found();
        assert_eq!(
            response.json::<serde_json::Value>()["error"]["code"],
            "not_found",
            "{path}"
        );
    }
}

#[tokio::test]
async fn test_update_quote_partial() {
    let server = server();
    let quote = create(&server, "Worse is better.", "Gabriel").await;

    let response = server
        .patch(&format!("/v1/quotes/{}", quote["id"]))
        .json(&json!({ "author": "Richard P. Gabriel" }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["quote"]["author"], "Richard P. Gabriel");
    assert_eq!(json["quote"]["content"], "Worse is better.");
    assert_eq!(json["quote"]["version"], 2);
}

#[tokio::test]
async fn test_update_quote_stale_version_conflicts() {
    let server = server();
    let quote = create(&server, "Worse is better.", "Gabriel").await;
    let path = format!("/v1/quotes/{}", quote["id"]);

    server
        .patch(&path)
        .json(&json!({ "content": "Worse is better, still.", "version": 1 }))
        .await
        .assert_status_ok();

    let response = server
        .patch(&path)
        .json(&json!({ "author": "RPG", "version": 1 }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "conflict"
    );
}

#[tokio::test]
async fn test_update_quote_empty_body_rejected() {
    let server = server();
    let quote = create(&server, "Less is more.", "Mies").await;

    let response = server
        .patch(&format!("/v1/quotes/{}", quote["id"]))
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_delete_quote() {
    let server = server();
    let quote = create(&server, "Less is more.", "Mies").await;
    let path = format!("/v1/quotes/{}", quote["id"]);

    let response = server.delete(&path).await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>()["message"],
        "quote successfully deleted"
    );

    server.get(&path).await.assert_status_not_found();
    server.delete(&path).await.assert_status_not_found();
}

#[tokio::test]
async fn test_list_quotes_filter_sort_and_paginate() {
    let server = server();
    create(&server, "Simplicity is prerequisite for reliability.", "Dijkstra").await;
    create(&server, "Beware of bugs in the above code.", "Knuth").await;
    create(&server, "Testing shows the presence, not the absence of bugs.", "Dijkstra").await;

    let response = server
        .get("/v1/quotes")
        .add_query_param("author", "dijk")
        .add_query_param("sort", "-id")
        .add_query_param("page_size", "1")
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    let quotes = json["quotes"].as_array().unwrap();

    assert_eq!(quotes.len(), 1);
    assert!(quotes[0]["content"].as_str().unwrap().starts_with("Testing"));
    assert_eq!(json["metadata"]["current_page"], 1);
    assert_eq!(json["metadata"]["page_size"], 1);
    assert_eq!(json["metadata"]["last_page"], 2);
    assert_eq!(json["metadata"]["total_records"], 2);
}

#[tokio::test]
async fn test_list_quotes_empty_metadata() {
    let server = server();

    let response = server.get("/v1/quotes").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["quotes"], json!([]));
    assert_eq!(json["metadata"], json!({}));
}

#[tokio::test]
async fn test_list_quotes_invalid_params() {
    let server = server();

    let response = server
        .get("/v1/quotes")
        .add_query_param("page", "0")
        .add_query_param("page_size", "101")
        .add_query_param("sort", "created_at")
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let details = &response.json::<serde_json::Value>()["error"]["details"];
    assert!(details.get("page").is_some());
    assert!(details.get("page_size").is_some());
    assert!(details.get("sort").is_some());
}

#[tokio::test]
async fn test_list_quotes_non_numeric_page_is_bad_request() {
    let server = server();

    let response = server.get("/v1/quotes").add_query_param("page", "two").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
