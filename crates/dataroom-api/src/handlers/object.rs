//! Raw object write and public object serving.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{content_type_for_filename, normalize_mime_type, validate_file_size};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::Response,
    Json,
};
use bytes::Bytes;
use dataroom_core::models::ObjectWriteResponse;
use dataroom_core::AppError;
use dataroom_storage::{storage_key, validate_key};
use futures::StreamExt;
use std::sync::Arc;

fn object_key(state: &AppState, bucket: &str, name: &str) -> Result<String, HttpAppError> {
    if !state.uploads.is_known_bucket(bucket) {
        return Err(AppError::NotFound(format!("Bucket not found: {}", bucket)).into());
    }
    let key = storage_key(bucket, name);
    validate_key(&key)?;
    Ok(key)
}

#[utoipa::path(
    post,
    path = "/storage/v1/object/{bucket}/{name}",
    tag = "objects",
    params(
        ("bucket" = String, Path, description = "Configured bucket name"),
        ("name" = String, Path, description = "Object name within the bucket")
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Object stored", body = ObjectWriteResponse),
        (status = 400, description = "Invalid object name", body = ErrorResponse),
        (status = 404, description = "Unknown bucket", body = ErrorResponse),
        (status = 413, description = "Object too large", body = ErrorResponse),
        (status = 500, description = "Storage write failed", body = ErrorResponse)
    )
)]
pub async fn write_object(
    State(state): State<Arc<AppState>>,
    Path((bucket, name)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ObjectWriteResponse>, HttpAppError> {
    let key = object_key(&state, &bucket, &name)?;
    if body.is_empty() {
        return Err(AppError::InvalidInput("Object body is empty".to_string()).into());
    }
    validate_file_size(body.len(), state.uploads.max_file_size)?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(normalize_mime_type)
        .unwrap_or_else(|| "application/octet-stream".to_string());

    state
        .storage
        .upload_with_key(&key, body.to_vec(), &content_type)
        .await?;

    Ok(Json(ObjectWriteResponse { key }))
}

#[utoipa::path(
    get,
    path = "/storage/v1/object/public/{bucket}/{name}",
    tag = "objects",
    params(
        ("bucket" = String, Path, description = "Configured bucket name"),
        ("name" = String, Path, description = "Object name within the bucket")
    ),
    responses(
        (status = 200, description = "Object content", content_type = "application/octet-stream"),
        (status = 404, description = "Object not found", body = ErrorResponse)
    )
)]
pub async fn get_public_object(
    State(state): State<Arc<AppState>>,
    Path((bucket, name)): Path<(String, String)>,
    method: Method,
) -> Result<Response, HttpAppError> {
    let key = object_key(&state, &bucket, &name)?;
    let length = state.storage.content_length(&key).await?;
    let content_type = content_type_for_filename(&name).unwrap_or("application/octet-stream");

    let builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, length)
        .header(header::CACHE_CONTROL, "public, max-age=3600");

    let body = if method == Method::HEAD {
        Body::empty()
    } else {
        let stream = state.storage.download_stream(&key).await?;
        Body::from_stream(stream.map(|result| {
            result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
        }))
    };

    builder.body(body).map_err(|e| {
        tracing::error!(error = %e, "Failed to build response");
        HttpAppError::from(AppError::Internal(e.to_string()))
    })
}
