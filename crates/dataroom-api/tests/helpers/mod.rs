//! Test helpers: build the upload service router over a temporary local store.
//!
//! Run from workspace root: `cargo test -p dataroom-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum::Router;
use axum_test::TestServer;
use dataroom_api::setup;
use dataroom_core::{Config, ServerConfig};
use std::collections::HashMap;
use tempfile::TempDir;

/// Public base URL used by the in-process test server.
pub const PUBLIC_BASE: &str = "http://localhost:4000/storage/v1/object/public";

/// Test application: server and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn storage_dir(&self) -> &std::path::Path {
        self._temp_dir.path()
    }
}

/// Configuration over `storage_dir` with extra variables layered on top.
pub fn test_config(storage_dir: &std::path::Path, public_base: &str, extra: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("ENVIRONMENT".into(), "test".into());
    vars.insert(
        "LOCAL_STORAGE_PATH".into(),
        storage_dir.to_string_lossy().to_string(),
    );
    vars.insert("PUBLIC_BASE_URL".into(), public_base.into());
    for (key, value) in extra {
        vars.insert((*key).to_string(), (*value).to_string());
    }
    let server = ServerConfig::from_lookup(|key| vars.get(key).cloned())
        .expect("valid test configuration");
    Config(Box::new(server))
}

/// Build the router the binary would serve.
pub async fn build_router(config: Config) -> Router {
    let (_state, router) = setup::initialize_app(config)
        .await
        .expect("Failed to initialize app");
    router
}

/// Setup test app with local storage in a temp directory.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

pub async fn setup_test_app_with(extra: &[(&str, &str)]) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = test_config(temp_dir.path(), PUBLIC_BASE, extra);
    let router = build_router(config).await;
    let server =
        TestServer::new(router.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        _temp_dir: temp_dir,
    }
}

/// Path part of a public URL served by the test app.
pub fn public_path(public_url: &str) -> String {
    public_url
        .strip_prefix("http://localhost:4000")
        .expect("public URL under the test base")
        .to_string()
}
