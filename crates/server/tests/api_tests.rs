//! Integration tests for the health endpoint and the API document.
//!
//! These tests require a running PostgreSQL database.
//! Run with: `cargo test -p server --features server --test api_tests`

#![cfg(feature = "server")]

mod common;

use axum::http::StatusCode;
use common::{get, test_app};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = test_app().await;
    let (status, body) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "connected");
    assert!(body["feed_revision"].is_u64());
}

#[tokio::test]
async fn openapi_document_lists_complaint_routes() {
    let app = test_app().await;
    let (status, body) = get(&app, "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    let doc: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(doc["info"]["title"], "Campus Complaint Desk API");
    for path in [
        "/api/v1/complaints",
        "/api/v1/complaints/public",
        "/api/v1/complaints/feed",
        "/api/v1/complaints/{id}/resolve",
        "/api/v1/users/count",
    ] {
        assert!(doc["paths"].get(path).is_some(), "missing {path}");
    }
}

#[tokio::test]
async fn docs_page_is_served() {
    let app = test_app().await;
    let (status, body) = get(&app, "/docs").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<html"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = test_app().await;
    let (status, _) = get(&app, "/api/v1/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
