//! The upload client against a real listening server.
//!
//! Run with: `cargo test -p dataroom-api --test round_trip_test`

mod helpers;

use dataroom_client::{ClientConfig, FallbackSequencer, UploadCandidate, UploadFile, UploadProfile};
use dataroom_core::constants::{PUBLIC_OBJECT_PREFIX, UPLOAD_FILE_PATH};
use helpers::fixtures::{create_minimal_png, create_test_pdf};
use helpers::{build_router, test_config};
use tempfile::TempDir;

struct RunningServer {
    base_url: String,
    _temp_dir: TempDir,
}

async fn spawn_server() -> RunningServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let public_base = format!("{}{}", base_url, PUBLIC_OBJECT_PREFIX);
    let router = build_router(test_config(temp_dir.path(), &public_base, &[])).await;

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });

    RunningServer {
        base_url,
        _temp_dir: temp_dir,
    }
}

#[tokio::test]
async fn dead_endpoint_falls_back_and_bytes_are_served() {
    let server = spawn_server().await;
    let pdf = create_test_pdf(2 * 1024 * 1024);

    let sequencer = FallbackSequencer::new(vec![
        UploadCandidate::multipart("dead", "http://127.0.0.1:1/api/upload-file"),
        UploadCandidate::multipart(
            "same-origin",
            format!("{}{}", server.base_url, UPLOAD_FILE_PATH),
        ),
    ])
    .unwrap();

    let result = sequencer
        .upload(&UploadFile::new("deck.pdf", None, pdf.clone()))
        .await;

    let url = result.public_url().expect("uploaded").to_string();
    assert!(url.starts_with(&format!("{}{}/uploads/deck-", server.base_url, PUBLIC_OBJECT_PREFIX)));
    let attempts = result.diagnostics().attempts();
    assert_eq!(attempts.len(), 2);
    assert!(attempts[0].error().unwrap().starts_with("Network error"));
    assert!(attempts[1].succeeded());

    let http = reqwest::Client::new();
    let response = http.get(&url).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/pdf"
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), pdf.as_slice());

    let head = http.head(&url).send().await.unwrap();
    assert_eq!(head.status(), 200);
    assert_eq!(
        head.headers()["content-length"].to_str().unwrap(),
        pdf.len().to_string()
    );
}

#[tokio::test]
async fn general_profile_writes_objects_directly() {
    let server = spawn_server().await;
    let config = ClientConfig::single(&server.base_url);
    let sequencer = UploadProfile::General.sequencer(&config).unwrap();

    let result = sequencer
        .upload(&UploadFile::new("notes.txt", None, b"quarterly notes".to_vec()))
        .await;

    let url = result.public_url().expect("uploaded").to_string();
    assert_eq!(result.diagnostics().attempts()[0].candidate, "direct-object");

    let body = reqwest::get(&url).await.unwrap().text().await.unwrap();
    assert_eq!(body, "quarterly notes");
}

#[tokio::test]
async fn logo_profile_reaches_the_logo_bucket() {
    let server = spawn_server().await;
    let config = ClientConfig::single(&server.base_url);
    let sequencer = UploadProfile::Logo.sequencer(&config).unwrap();
    let png = create_minimal_png();

    let result = sequencer
        .upload(&UploadFile::new("logo.png", None, png.clone()))
        .await;

    let attempts = result.diagnostics().attempts();
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].candidate, "logo-edge-function");
    let url = result.public_url().expect("uploaded").to_string();
    assert!(url.contains("/investment-logos/logo-"));

    let fetched = reqwest::get(&url).await.unwrap().bytes().await.unwrap();
    assert_eq!(fetched.as_ref(), png.as_slice());
}
