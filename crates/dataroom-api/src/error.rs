//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>` and use `?` on
//! `AppError` or `StorageError` so every failure renders the same body:
//! `{ "error", "details"?, "code", ... }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dataroom_core::{AppError, ErrorMetadata, LogLevel};
use dataroom_storage::StorageError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: both the trait and AppError are foreign to this crate)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| is_production_name(&env))
        .unwrap_or(false)
}

fn is_production_name(env: &str) -> bool {
    let env = env.to_lowercase();
    env == "production" || env == "prod"
}

impl HttpAppError {
    /// Build the response body. Details of sensitive errors are withheld in production.
    fn to_body(&self, is_production: bool) -> ErrorResponse {
        let app_error = &self.0;
        let (details, error_type) = if is_production && app_error.is_sensitive() {
            (None, None)
        } else {
            (
                Some(app_error.detailed_message()),
                Some(app_error.error_type().to_string()),
            )
        };

        ErrorResponse {
            error: app_error.client_message(),
            details,
            error_type,
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&self.0);

        let body = self.to_body(is_production_env());
        (status, Json(body)).into_response()
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::UploadFailed(msg) => AppError::Storage(msg),
            StorageError::DownloadFailed(msg) => AppError::Storage(msg),
            StorageError::BackendError(msg) => AppError::Storage(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_error_not_found() {
        let storage_err = StorageError::NotFound("File not found".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::NotFound(msg) => assert_eq!(msg, "File not found"),
            _ => panic!("Expected NotFound variant"),
        }
    }

    #[test]
    fn test_from_storage_error_upload_failed() {
        let storage_err = StorageError::UploadFailed("bucket not found".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::Storage(msg) => assert_eq!(msg, "bucket not found"),
            _ => panic!("Expected Storage variant"),
        }
    }

    #[test]
    fn test_from_storage_error_invalid_key() {
        let storage_err = StorageError::InvalidKey("Invalid key".to_string());
        let HttpAppError(app_err) = storage_err.into();
        assert!(matches!(app_err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_from_storage_error_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let HttpAppError(app_err) = StorageError::IoError(io_err).into();
        match app_err {
            AppError::Internal(msg) => assert!(msg.contains("denied")),
            _ => panic!("Expected Internal variant"),
        }
    }

    #[test]
    fn test_storage_failure_exposes_provider_detail_outside_production() {
        let err = HttpAppError(AppError::Storage("disk quota exceeded".to_string()));
        let body = err.to_body(false);
        assert_eq!(body.error, "Upload failed");
        assert_eq!(body.code, "STORAGE_ERROR");
        assert_eq!(body.details.as_deref(), Some("disk quota exceeded"));
    }

    #[test]
    fn test_production_hides_details() {
        let err = HttpAppError(AppError::Storage("disk quota exceeded".to_string()));
        let body = err.to_body(true);
        assert!(body.details.is_none());
        assert!(body.error_type.is_none());
        assert_eq!(body.error, "Upload failed");
    }

    #[test]
    fn test_production_keeps_details_of_client_errors() {
        let err = HttpAppError(AppError::FormParse("missing boundary".to_string()));
        let body = err.to_body(true);
        assert_eq!(body.code, "FORM_PARSE_ERROR");
        assert!(body.details.unwrap().contains("missing boundary"));
        assert_eq!(body.error_type.as_deref(), Some("FormParse"));
    }

    #[test]
    fn test_production_names() {
        assert!(is_production_name("production"));
        assert!(is_production_name("PROD"));
        assert!(!is_production_name("development"));
    }

    #[test]
    fn test_error_response_shape() {
        let response = HttpAppError(AppError::MissingFile).to_body(false);
        let json = serde_json::to_value(&response).expect("serialize");
        assert_eq!(json["error"], "No file uploaded");
        assert_eq!(json["code"], "MISSING_FILE");
        assert_eq!(json["recoverable"], false);
    }
}
