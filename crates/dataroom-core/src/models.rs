//! Wire models for the upload endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Successful upload response.
///
/// Serialized as `{ "publicUrl": ..., "filePath": ..., "message": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub public_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UploadResponse {
    pub fn new(public_url: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            public_url: public_url.into(),
            file_path: Some(file_path.into()),
            message: Some("File uploaded successfully".to_string()),
        }
    }
}

/// Response of a raw-body object write. Mirrors the hosted storage API (`{ "Key": ... }`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ObjectWriteResponse {
    #[serde(rename = "Key")]
    pub key: String,
}

/// Minimal error body that clients read from non-2xx responses.
///
/// The server emits a richer shape; only `error` and `details` are relied upon.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
