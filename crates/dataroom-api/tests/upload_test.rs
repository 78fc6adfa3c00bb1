//! Multipart upload integration tests.
//!
//! Run with: `cargo test -p dataroom-api --test upload_test`

mod helpers;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use helpers::{fixtures, public_path, setup_test_app, setup_test_app_with};
use serde_json::Value;

fn file_form(data: Vec<u8>, file_name: &str, mime: &str) -> MultipartForm {
    MultipartForm::new().add_part("file", Part::bytes(data).file_name(file_name).mime_type(mime))
}

#[tokio::test]
async fn test_upload_returns_public_url() {
    let app = setup_test_app().await;
    let pdf = fixtures::create_test_pdf(4096);

    let response = app
        .client()
        .post("/api/upload-file")
        .multipart(file_form(pdf, "deck.pdf", "application/pdf"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let url = body["publicUrl"].as_str().expect("publicUrl");
    assert!(url.starts_with("http://localhost:4000/storage/v1/object/public/uploads/deck-"));
    assert!(url.ends_with(".pdf"));
    assert!(body["filePath"].as_str().unwrap().starts_with("uploads/deck-"));
    assert_eq!(body["message"], "File uploaded successfully");
}

#[tokio::test]
async fn test_uploaded_file_is_served_byte_identical() {
    let app = setup_test_app().await;
    let pdf = fixtures::create_test_pdf(64 * 1024);

    let response = app
        .client()
        .post("/functions/v1/upload-file")
        .multipart(file_form(pdf.clone(), "deck.pdf", "application/pdf"))
        .await;
    response.assert_status_ok();
    let url = response.json::<Value>()["publicUrl"]
        .as_str()
        .unwrap()
        .to_string();

    let fetched = app.client().get(&public_path(&url)).await;
    fetched.assert_status_ok();
    assert_eq!(
        fetched.header(header::CONTENT_TYPE),
        HeaderValue::from_static("application/pdf")
    );
    assert_eq!(fetched.as_bytes().as_ref(), pdf.as_slice());
}

#[tokio::test]
async fn test_two_uploads_of_same_name_get_distinct_urls() {
    let app = setup_test_app().await;
    let mut urls = Vec::new();
    for _ in 0..2 {
        let response = app
            .client()
            .post("/api/upload-file")
            .multipart(file_form(b"same".to_vec(), "notes.txt", "text/plain"))
            .await;
        response.assert_status_ok();
        urls.push(response.json::<Value>()["publicUrl"].as_str().unwrap().to_string());
    }
    assert_ne!(urls[0], urls[1]);
}

#[tokio::test]
async fn test_missing_file_field_is_rejected() {
    let app = setup_test_app().await;
    let form = MultipartForm::new().add_text("name", "deck.pdf");

    let response = app
        .client()
        .post("/api/upload-file")
        .multipart(form)
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "MISSING_FILE");
    assert_eq!(body["error"], "No file uploaded");
}

#[tokio::test]
async fn test_non_multipart_body_is_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/upload-file")
        .content_type("application/json")
        .text("{}")
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.header(header::CONTENT_TYPE),
        HeaderValue::from_static("application/json")
    );
    let body: Value = response.json();
    assert_eq!(body["code"], "FORM_PARSE_ERROR");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to parse form data"));
}

#[tokio::test]
async fn test_logo_route_rejects_non_multipart_body_as_json() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/functions/v1/upload-investment-logo")
        .content_type("text/plain")
        .text("logo")
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "FORM_PARSE_ERROR");
}

#[tokio::test]
async fn test_names_with_inner_dots_are_accepted() {
    let app = setup_test_app().await;

    for name in ["Q3..final.pdf", "deck...pdf"] {
        let response = app
            .client()
            .post("/api/upload-file")
            .multipart(file_form(
                fixtures::create_test_pdf(1024),
                name,
                "application/pdf",
            ))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        let file_path = body["filePath"].as_str().expect("filePath");
        assert!(file_path.starts_with("uploads/"));
        assert!(file_path.ends_with(".pdf"));
        assert!(!file_path.contains(".."));
    }
}

#[tokio::test]
async fn test_oversized_file_is_rejected_with_413() {
    let app = setup_test_app_with(&[("MAX_FILE_SIZE_MB", "1")]).await;
    let pdf = fixtures::create_test_pdf(1024 * 1024 + 1);

    let response = app
        .client()
        .post("/api/upload-file")
        .multipart(file_form(pdf, "big.pdf", "application/pdf"))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(response.json::<Value>()["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_logo_upload_goes_to_logo_bucket() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/functions/v1/upload-investment-logo")
        .multipart(file_form(fixtures::create_minimal_png(), "Acme Logo.png", "image/png"))
        .await;

    response.assert_status_ok();
    let url = response.json::<Value>()["publicUrl"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(url.contains("/investment-logos/acme_logo-"));
    assert!(url.ends_with(".png"));
}

#[tokio::test]
async fn test_logo_upload_rejects_non_images() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/functions/v1/upload-investment-logo")
        .multipart(file_form(fixtures::create_test_pdf(512), "deck.pdf", "application/pdf"))
        .expect_failure()
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/upload-file")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://deals.example.com"))
        .multipart(file_form(b"hello".to_vec(), "hello.txt", "text/plain"))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        HeaderValue::from_static("*")
    );
}
