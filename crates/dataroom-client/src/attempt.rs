//! A single upload attempt against one candidate endpoint.

use crate::candidate::{Transport, UploadCandidate};
use crate::file::UploadFile;
use dataroom_core::models::ErrorBody;
use dataroom_core::naming::generate_object_name;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

/// Longest slice of a response body kept in an error message.
const MAX_BODY_EXCERPT: usize = 300;

#[derive(Debug, Clone, thiserror::Error)]
pub enum AttemptError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Timed out after {:.1}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("HTTP {status}: {message}")]
    HttpStatus {
        status: u16,
        message: String,
        body: String,
    },

    #[error("Malformed JSON response (HTTP {status}): {message}")]
    MalformedJson { status: u16, message: String },

    #[error("Response (HTTP {status}) did not include a publicUrl")]
    MissingPublicUrl { status: u16 },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl AttemptError {
    /// HTTP status of the response, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            AttemptError::HttpStatus { status, .. }
            | AttemptError::MalformedJson { status, .. }
            | AttemptError::MissingPublicUrl { status } => Some(*status),
            _ => None,
        }
    }
}

/// What a successful attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptSuccess {
    pub public_url: String,
    pub file_path: Option<String>,
    pub status: u16,
}

/// One POST of one file to one candidate, bounded by `timeout`.
///
/// The timeout covers the whole exchange (connect, upload, response body).
/// When it fires the in-flight request is dropped.
pub struct UploadAttempt<'a> {
    client: &'a Client,
    candidate: &'a UploadCandidate,
    timeout: Duration,
}

impl<'a> UploadAttempt<'a> {
    pub fn new(client: &'a Client, candidate: &'a UploadCandidate, timeout: Duration) -> Self {
        Self {
            client,
            candidate,
            timeout,
        }
    }

    pub async fn run(&self, file: &UploadFile) -> Result<AttemptSuccess, AttemptError> {
        match tokio::time::timeout(self.timeout, self.send(file)).await {
            Ok(result) => result,
            Err(_) => Err(AttemptError::Timeout(self.timeout)),
        }
    }

    async fn send(&self, file: &UploadFile) -> Result<AttemptSuccess, AttemptError> {
        match &self.candidate.transport {
            Transport::Multipart {
                field_name,
                headers,
            } => {
                let part = Part::bytes(file.data.to_vec())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.content_type)
                    .map_err(|e| AttemptError::InvalidRequest(e.to_string()))?;
                let form = Form::new().part(field_name.clone(), part);

                let request = apply_headers(self.client.post(&self.candidate.endpoint_url), headers)
                    .multipart(form);
                let (status, body) = execute(request).await?;
                parse_upload_response(status, &body)
            }
            Transport::DirectObject {
                bucket,
                public_base_url,
                headers,
            } => {
                let object_name = generate_object_name(&file.file_name);
                let url = format!(
                    "{}/{}/{}",
                    self.candidate.endpoint_url.trim_end_matches('/'),
                    urlencoding::encode(bucket),
                    urlencoding::encode(&object_name)
                );

                let request = apply_headers(self.client.post(&url), headers)
                    .header(CONTENT_TYPE, file.content_type.as_str())
                    .body(file.data.clone());
                let (status, body) = execute(request).await?;
                if !(200..300).contains(&status) {
                    return Err(http_status_error(status, &body));
                }

                Ok(AttemptSuccess {
                    public_url: format!(
                        "{}/{}/{}",
                        public_base_url.trim_end_matches('/'),
                        bucket,
                        object_name
                    ),
                    file_path: Some(format!("{}/{}", bucket, object_name)),
                    status,
                })
            }
        }
    }
}

fn apply_headers(mut request: RequestBuilder, headers: &[(String, String)]) -> RequestBuilder {
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }
    request
}

async fn execute(request: RequestBuilder) -> Result<(u16, String), AttemptError> {
    let response: Response = request
        .send()
        .await
        .map_err(|e| AttemptError::Network(error_chain(&e)))?;
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| AttemptError::Network(error_chain(&e)))?;
    Ok((status, body))
}

/// Classify a multipart endpoint's answer.
pub(crate) fn parse_upload_response(status: u16, body: &str) -> Result<AttemptSuccess, AttemptError> {
    if !(200..300).contains(&status) {
        return Err(http_status_error(status, body));
    }

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| AttemptError::MalformedJson {
            status,
            message: e.to_string(),
        })?;

    let public_url = value
        .get("publicUrl")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or(AttemptError::MissingPublicUrl { status })?;

    Ok(AttemptSuccess {
        public_url: public_url.to_string(),
        file_path: value
            .get("filePath")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        status,
    })
}

fn http_status_error(status: u16, body: &str) -> AttemptError {
    let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
    let message = match parsed {
        Some(ErrorBody {
            error: Some(error),
            details,
        }) => match details {
            Some(serde_json::Value::String(details)) => format!("{} ({})", error, details),
            Some(serde_json::Value::Null) | None => error,
            Some(other) => format!("{} ({})", error, other),
        },
        _ => excerpt(body),
    };

    AttemptError::HttpStatus {
        status,
        message,
        body: body.to_string(),
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "(empty body)".to_string();
    }
    match trimmed.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

/// Render an error with its sources, since reqwest hides the root cause.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_requires_public_url() {
        let ok = parse_upload_response(200, r#"{"publicUrl":"https://x/y/a.pdf","filePath":"y/a.pdf"}"#)
            .unwrap();
        assert_eq!(ok.public_url, "https://x/y/a.pdf");
        assert_eq!(ok.file_path.as_deref(), Some("y/a.pdf"));

        assert!(matches!(
            parse_upload_response(200, r#"{"publicUrl":"  "}"#),
            Err(AttemptError::MissingPublicUrl { status: 200 })
        ));
        assert!(matches!(
            parse_upload_response(201, r#"{"url":"https://x"}"#),
            Err(AttemptError::MissingPublicUrl { status: 201 })
        ));
    }

    #[test]
    fn malformed_json_is_its_own_failure() {
        let err = parse_upload_response(200, "<html>ok</html>").unwrap_err();
        assert!(matches!(err, AttemptError::MalformedJson { status: 200, .. }));
        assert_eq!(err.status(), Some(200));
    }

    #[test]
    fn http_errors_prefer_the_error_field() {
        let err = parse_upload_response(
            500,
            r#"{"error":"Upload failed","details":"bucket not found","code":"STORAGE_ERROR"}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500: Upload failed (bucket not found)");

        let err = parse_upload_response(404, "Not Found").unwrap_err();
        assert_eq!(err.to_string(), "HTTP 404: Not Found");

        let err = parse_upload_response(502, "").unwrap_err();
        assert_eq!(err.to_string(), "HTTP 502: (empty body)");
    }

    #[test]
    fn long_bodies_are_cut() {
        let body = "x".repeat(1000);
        match parse_upload_response(500, &body).unwrap_err() {
            AttemptError::HttpStatus { message, body: full, .. } => {
                assert_eq!(message.len(), MAX_BODY_EXCERPT + 3);
                assert_eq!(full.len(), 1000);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn timeout_message_names_the_limit() {
        let err = AttemptError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "Timed out after 1.5s");
        assert_eq!(err.status(), None);
    }
}
