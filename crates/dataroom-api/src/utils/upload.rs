//! Common utilities for file upload handlers

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::Multipart;
use axum::http::StatusCode;
use dataroom_core::constants::FILE_FIELD;
use dataroom_core::AppError;

/// Content types accepted by the logo endpoint.
pub const LOGO_CONTENT_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

/// A file pulled out of a multipart body.
#[derive(Debug)]
pub struct ReceivedFile {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

/// Extract the file field from a multipart form.
/// Only one field named "file" is accepted; other fields are ignored.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<ReceivedFile, AppError> {
    let mut received: Option<ReceivedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        if received.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "unknown".to_string());
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let data = field
            .bytes()
            .await
            .map_err(multipart_error)?;

        received = Some(ReceivedFile {
            data: data.to_vec(),
            filename,
            content_type,
        });
    }

    received.ok_or(AppError::MissingFile)
}

/// Body limit hits surface as 413, everything else as an unreadable form.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::FormParse(err.body_text())
    }
}

/// A request that is not a readable multipart form.
pub fn multipart_rejection(rejection: MultipartRejection) -> AppError {
    AppError::FormParse(rejection.body_text())
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

/// Logos must declare an image content type, or carry an image extension
/// when the client sent a generic one.
pub fn validate_logo(filename: &str, content_type: &str) -> Result<(), AppError> {
    let normalized = normalize_mime_type(content_type);
    if LOGO_CONTENT_TYPES.contains(&normalized.as_str()) {
        return Ok(());
    }
    if normalized == "application/octet-stream" {
        if let Some(guessed) = content_type_for_filename(filename) {
            if LOGO_CONTENT_TYPES.contains(&guessed) {
                return Ok(());
            }
        }
    }
    Err(AppError::InvalidInput(format!(
        "Invalid content type. Allowed types: {}",
        LOGO_CONTENT_TYPES.join(", ")
    )))
}

/// Sanitize filename to prevent path traversal and invalid characters.
/// Returns an error if the name is nothing but dots (`.`, `..`).
pub fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    const MAX_FILENAME_LENGTH: usize = 255;

    let filename_only = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    if !filename_only.is_empty() && filename_only.chars().all(|c| c == '.') {
        return Err(AppError::InvalidInput(
            "Filename contains invalid path traversal".to_string(),
        ));
    }

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim().is_empty() || sanitized.len() < 3 {
        return Ok("file".to_string());
    }

    Ok(sanitized)
}

/// Content type to serve for a stored object, from its extension.
pub fn content_type_for_filename(filename: &str) -> Option<&'static str> {
    let (_, extension) = filename.rsplit_once('.')?;
    let content_type = match extension.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "zip" => "application/zip",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        _ => return None,
    };
    Some(content_type)
}
