//! Route configuration and setup.
//!
//! Upload and object routes live in [handlers](crate::handlers); health checks in [health](health).

mod health;

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use dataroom_core::constants::{
    BODY_LIMIT_SLACK_BYTES, EDGE_UPLOAD_FILE_PATH, EDGE_UPLOAD_LOGO_PATH, OBJECT_PREFIX,
    PUBLIC_OBJECT_PREFIX, UPLOAD_FILE_PATH,
};
use dataroom_core::Config;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let request_timeout_secs = config.request_timeout_secs().max(1);
    tracing::info!(request_timeout_secs, "Request timeout layer enabled");

    let app = upload_routes()
        .merge(object_routes())
        .merge(public_routes())
        .layer(RequestBodyLimitLayer::new(
            config
                .max_file_size_bytes()
                .saturating_add(BODY_LIMIT_SLACK_BYTES),
        ))
        .layer(DefaultBodyLimit::disable())
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout_secs)))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::HEAD, Method::POST, Method::OPTIONS];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

fn upload_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(UPLOAD_FILE_PATH, post(handlers::upload::upload_file))
        .route(EDGE_UPLOAD_FILE_PATH, post(handlers::upload::upload_file))
        .route(
            EDGE_UPLOAD_LOGO_PATH,
            post(handlers::upload::upload_investment_logo),
        )
}

fn object_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/{{bucket}}/{{*name}}", PUBLIC_OBJECT_PREFIX),
            get(handlers::object::get_public_object),
        )
        .route(
            &format!("{}/{{bucket}}/{{*name}}", OBJECT_PREFIX),
            post(handlers::object::write_object),
        )
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}
