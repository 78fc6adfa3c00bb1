//! Direct object write, public read and health integration tests.
//!
//! Run with: `cargo test -p dataroom-api --test objects_test`

mod helpers;

use axum::http::{header, StatusCode};
use bytes::Bytes;
use helpers::{fixtures, setup_test_app};
use serde_json::Value;

#[tokio::test]
async fn test_direct_object_write_then_read() {
    let app = setup_test_app().await;
    let png = fixtures::create_minimal_png();

    let response = app
        .client()
        .post("/storage/v1/object/investment-logos/acme-1a2b.png")
        .content_type("image/png")
        .bytes(Bytes::from(png.clone()))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["Key"], "investment-logos/acme-1a2b.png");

    let fetched = app
        .client()
        .get("/storage/v1/object/public/investment-logos/acme-1a2b.png")
        .await;
    fetched.assert_status_ok();
    assert_eq!(fetched.header(header::CONTENT_TYPE), "image/png");
    assert_eq!(fetched.as_bytes().as_ref(), png.as_slice());
}

#[tokio::test]
async fn test_nested_object_names_are_kept() {
    let app = setup_test_app().await;

    app.client()
        .post("/storage/v1/object/uploads/2024/q3/deck.pdf")
        .bytes(Bytes::from_static(b"%PDF-1.4"))
        .await
        .assert_status_ok();

    assert!(app.storage_dir().join("uploads/2024/q3/deck.pdf").is_file());
}

#[tokio::test]
async fn test_unknown_bucket_is_not_found() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/storage/v1/object/secrets/a.txt")
        .bytes(Bytes::from_static(b"x"))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_public_object_is_not_found() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/storage/v1/object/public/uploads/nope.pdf")
        .expect_failure()
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_health_and_liveness() {
    let app = setup_test_app().await;

    let health = app.client().get("/health").await;
    health.assert_status_ok();
    let body: Value = health.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "local");

    let live = app.client().get("/live").await;
    live.assert_status_ok();
    assert_eq!(live.json::<Value>()["status"], "alive");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["paths"].get("/api/upload-file").is_some());
}
