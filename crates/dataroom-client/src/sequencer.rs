//! Ordered fallback across upload endpoints.
//!
//! Candidates are tried strictly one after another. The first success wins;
//! every attempt lands in the diagnostic log. There is no backoff, no retry
//! of the same endpoint and no racing.

use crate::attempt::UploadAttempt;
use crate::board::UrlBoard;
use crate::candidate::UploadCandidate;
use crate::diagnostics::{AttemptOutcome, AttemptRecord, DiagnosticLog};
use crate::file::UploadFile;
use crate::session::{SessionObject, SessionObjects};
use anyhow::{Context, Result};
use chrono::Utc;
use dataroom_core::constants::DEFAULT_MAX_FILE_SIZE_MB;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_SIZE: usize = DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Per-attempt timeout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeoutPolicy {
    Fixed(Duration),
    /// `base + per_mb * size_in_mb`, capped at `max`.
    SizeScaled {
        base: Duration,
        per_mb: Duration,
        max: Duration,
    },
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        TimeoutPolicy::Fixed(DEFAULT_ATTEMPT_TIMEOUT)
    }
}

impl TimeoutPolicy {
    pub fn for_size(&self, size_bytes: usize) -> Duration {
        match *self {
            TimeoutPolicy::Fixed(timeout) => timeout,
            TimeoutPolicy::SizeScaled { base, per_mb, max } => {
                let scaled = base + per_mb.mul_f64(size_bytes as f64 / BYTES_PER_MB);
                scaled.min(max)
            }
        }
    }
}

/// Which files a sequencer is willing to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AcceptList {
    Any,
    /// Accepted when either the content type or the extension matches.
    Only {
        content_types: Vec<String>,
        extensions: Vec<String>,
    },
}

impl AcceptList {
    pub fn only(content_types: &[&str], extensions: &[&str]) -> Self {
        AcceptList::Only {
            content_types: content_types.iter().map(|s| s.to_string()).collect(),
            extensions: extensions.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn accepts(&self, file: &UploadFile) -> bool {
        match self {
            AcceptList::Any => true,
            AcceptList::Only {
                content_types,
                extensions,
            } => {
                let content_type = file
                    .content_type
                    .split(';')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_lowercase();
                content_types.iter().any(|ct| *ct == content_type)
                    || file
                        .extension()
                        .is_some_and(|ext| extensions.iter().any(|e| *e == ext))
            }
        }
    }
}

/// Reasons a file is refused before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreflightError {
    #[error("File is empty")]
    Empty,

    #[error("File is too large: {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("File type not accepted: {file_name} ({content_type})")]
    NotAccepted {
        file_name: String,
        content_type: String,
    },
}

/// Outcome of a fallback upload.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadResult {
    Uploaded {
        public_url: String,
        file_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        file_path: Option<String>,
        endpoint: String,
        diagnostics: DiagnosticLog,
    },
    /// Every endpoint failed; the bytes are only held in session memory.
    Transient {
        reference: String,
        file_name: String,
        size: usize,
        error_message: String,
        diagnostics: DiagnosticLog,
    },
    Failed {
        error_message: String,
        diagnostic_log: DiagnosticLog,
    },
}

impl UploadResult {
    /// True only for a real remote upload.
    pub fn is_uploaded(&self) -> bool {
        matches!(self, UploadResult::Uploaded { .. })
    }

    pub fn public_url(&self) -> Option<&str> {
        match self {
            UploadResult::Uploaded { public_url, .. } => Some(public_url),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            UploadResult::Failed { error_message, .. }
            | UploadResult::Transient { error_message, .. } => Some(error_message),
            UploadResult::Uploaded { .. } => None,
        }
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        match self {
            UploadResult::Uploaded { diagnostics, .. }
            | UploadResult::Transient { diagnostics, .. } => diagnostics,
            UploadResult::Failed { diagnostic_log, .. } => diagnostic_log,
        }
    }
}

pub struct FallbackSequencer {
    client: Client,
    candidates: Vec<UploadCandidate>,
    timeout_policy: TimeoutPolicy,
    max_size: usize,
    accept: AcceptList,
    session: Option<Arc<SessionObjects>>,
    board: Option<(Arc<UrlBoard>, String)>,
}

impl FallbackSequencer {
    pub fn new(candidates: Vec<UploadCandidate>) -> Result<Self> {
        // Timeouts are enforced per attempt, not on the client.
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self::with_client(client, candidates))
    }

    pub fn with_client(client: Client, candidates: Vec<UploadCandidate>) -> Self {
        Self {
            client,
            candidates,
            timeout_policy: TimeoutPolicy::default(),
            max_size: DEFAULT_MAX_SIZE,
            accept: AcceptList::Any,
            session: None,
            board: None,
        }
    }

    pub fn with_timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.timeout_policy = policy;
        self
    }

    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_accept(mut self, accept: AcceptList) -> Self {
        self.accept = accept;
        self
    }

    /// Keep the file in `session` memory when every endpoint fails.
    pub fn with_transient_fallback(mut self, session: Arc<SessionObjects>) -> Self {
        self.session = Some(session);
        self
    }

    /// Publish successful URLs to `slot` on `board`.
    pub fn with_board(mut self, board: Arc<UrlBoard>, slot: impl Into<String>) -> Self {
        self.board = Some((board, slot.into()));
        self
    }

    pub fn candidates(&self) -> &[UploadCandidate] {
        &self.candidates
    }

    pub fn timeout_policy(&self) -> TimeoutPolicy {
        self.timeout_policy
    }

    pub fn preflight(&self, file: &UploadFile) -> Result<(), PreflightError> {
        if file.size() == 0 {
            return Err(PreflightError::Empty);
        }
        if file.size() > self.max_size {
            return Err(PreflightError::TooLarge {
                size: file.size(),
                limit: self.max_size,
            });
        }
        if !self.accept.accepts(file) {
            return Err(PreflightError::NotAccepted {
                file_name: file.file_name.clone(),
                content_type: file.content_type.clone(),
            });
        }
        Ok(())
    }

    pub async fn upload(&self, file: &UploadFile) -> UploadResult {
        let mut log = DiagnosticLog::new();

        if let Err(e) = self.preflight(file) {
            tracing::warn!(file_name = %file.file_name, size_bytes = file.size(), error = %e, "Upload rejected before sending");
            log.note(format!("Rejected before upload: {}", e));
            return UploadResult::Failed {
                error_message: e.to_string(),
                diagnostic_log: log,
            };
        }

        let timeout = self.timeout_policy.for_size(file.size());

        for candidate in &self.candidates {
            let started_at = Utc::now();
            let start = Instant::now();
            let result = UploadAttempt::new(&self.client, candidate, timeout)
                .run(file)
                .await;
            let duration_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(success) => {
                    tracing::info!(
                        endpoint = %candidate.endpoint_url,
                        candidate = %candidate.name,
                        status = success.status,
                        size_bytes = file.size(),
                        duration_ms,
                        "Upload succeeded"
                    );
                    log.record(AttemptRecord {
                        candidate: candidate.name.clone(),
                        endpoint: candidate.endpoint_url.clone(),
                        started_at,
                        duration_ms,
                        status: Some(success.status),
                        outcome: AttemptOutcome::Succeeded {
                            public_url: success.public_url.clone(),
                        },
                    });

                    if let Some((board, slot)) = &self.board {
                        board.publish(slot, success.public_url.clone()).await;
                    }

                    return UploadResult::Uploaded {
                        public_url: success.public_url,
                        file_name: file.file_name.clone(),
                        file_path: success.file_path,
                        endpoint: candidate.endpoint_url.clone(),
                        diagnostics: log,
                    };
                }
                Err(e) => {
                    tracing::warn!(
                        endpoint = %candidate.endpoint_url,
                        candidate = %candidate.name,
                        status = ?e.status(),
                        duration_ms,
                        error = %e,
                        "Upload attempt failed, trying next endpoint"
                    );
                    log.record(AttemptRecord {
                        candidate: candidate.name.clone(),
                        endpoint: candidate.endpoint_url.clone(),
                        started_at,
                        duration_ms,
                        status: e.status(),
                        outcome: AttemptOutcome::Failed {
                            error: e.to_string(),
                        },
                    });
                }
            }
        }

        let error_message = match log.last_error() {
            Some(last) => format!("All upload methods failed. Last error: {}", last),
            None => "No upload endpoints configured".to_string(),
        };

        if let Some(session) = &self.session {
            let reference = session
                .store(SessionObject {
                    file_name: file.file_name.clone(),
                    content_type: file.content_type.clone(),
                    data: file.data.clone(),
                })
                .await;
            tracing::warn!(reference = %reference, error = %error_message, "Kept file in session memory only");
            log.note(format!("{}; file kept in session memory only", error_message));
            return UploadResult::Transient {
                reference,
                file_name: file.file_name.clone(),
                size: file.size(),
                error_message,
                diagnostics: log,
            };
        }

        tracing::error!(file_name = %file.file_name, error = %error_message, "Upload failed on every endpoint");
        UploadResult::Failed {
            error_message,
            diagnostic_log: log,
        }
    }
}
