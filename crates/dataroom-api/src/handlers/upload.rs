//! Multipart upload handlers.
//!
//! Each route takes a single `file` field, stores it under a random name in
//! its bucket and answers with the object's public URL.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{
    extract_multipart_file, multipart_rejection, sanitize_filename, validate_file_size,
    validate_logo,
};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use dataroom_core::models::UploadResponse;
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UploadKind {
    General,
    Logo,
}

#[utoipa::path(
    post,
    path = "/api/upload-file",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded successfully", body = UploadResponse),
        (status = 400, description = "Unreadable form or missing file field", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Storage write failed", body = ErrorResponse)
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let multipart = multipart.map_err(multipart_rejection)?;
    let bucket = state.uploads.upload_bucket.clone();
    store_upload(&state, multipart, &bucket, UploadKind::General).await
}

#[utoipa::path(
    post,
    path = "/functions/v1/upload-investment-logo",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Logo uploaded successfully", body = UploadResponse),
        (status = 400, description = "Missing file or not an image", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Storage write failed", body = ErrorResponse)
    )
)]
pub async fn upload_investment_logo(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let multipart = multipart.map_err(multipart_rejection)?;
    let bucket = state.uploads.logo_bucket.clone();
    store_upload(&state, multipart, &bucket, UploadKind::Logo).await
}

async fn store_upload(
    state: &AppState,
    multipart: Multipart,
    bucket: &str,
    kind: UploadKind,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let start = Instant::now();
    let file = extract_multipart_file(multipart).await?;

    validate_file_size(file.data.len(), state.uploads.max_file_size)?;
    if kind == UploadKind::Logo {
        validate_logo(&file.filename, &file.content_type)?;
    }
    let filename = sanitize_filename(&file.filename)?;
    let size = file.data.len();

    let (key, public_url) = state
        .storage
        .upload(bucket, &filename, &file.content_type, file.data)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, bucket = %bucket, filename = %filename, "Failed to store upload");
            HttpAppError::from(e)
        })?;

    tracing::info!(
        bucket = %bucket,
        key = %key,
        content_type = %file.content_type,
        size_bytes = size,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Upload stored"
    );

    Ok(Json(UploadResponse::new(public_url, key)))
}
