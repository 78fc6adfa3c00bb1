//! Per-attempt diagnostics and endpoint probes.

use crate::candidate::UploadCandidate;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};

/// Default HEAD probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AttemptOutcome {
    Succeeded { public_url: String },
    Failed { error: String },
}

/// What happened when one candidate was tried.
#[derive(Clone, Debug, Serialize)]
pub struct AttemptRecord {
    pub candidate: String,
    pub endpoint: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

impl AttemptRecord {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Succeeded { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            AttemptOutcome::Failed { error } => Some(error),
            AttemptOutcome::Succeeded { .. } => None,
        }
    }
}

/// Ordered transcript of one upload: every attempt plus free-form notes.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DiagnosticLog {
    attempts: Vec<AttemptRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    notes: Vec<String>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: AttemptRecord) {
        self.attempts.push(record);
    }

    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn attempts(&self) -> &[AttemptRecord] {
        &self.attempts
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn failures(&self) -> impl Iterator<Item = &AttemptRecord> {
        self.attempts.iter().filter(|a| !a.succeeded())
    }

    /// Error text of the most recent failed attempt.
    pub fn last_error(&self) -> Option<&str> {
        self.attempts.iter().rev().find_map(|a| a.error())
    }

    /// Human-readable transcript, one line per attempt.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (index, attempt) in self.attempts.iter().enumerate() {
            let status = attempt
                .status
                .map(|s| format!(" [{}]", s))
                .unwrap_or_default();
            let line = match &attempt.outcome {
                AttemptOutcome::Succeeded { public_url } => format!(
                    "#{} {} POST {}{} -> OK {} ({} ms)",
                    index + 1,
                    attempt.candidate,
                    attempt.endpoint,
                    status,
                    public_url,
                    attempt.duration_ms
                ),
                AttemptOutcome::Failed { error } => format!(
                    "#{} {} POST {}{} -> FAILED: {} ({} ms)",
                    index + 1,
                    attempt.candidate,
                    attempt.endpoint,
                    status,
                    error,
                    attempt.duration_ms
                ),
            };
            out.push_str(&line);
            out.push('\n');
        }
        for note in &self.notes {
            out.push_str("note: ");
            out.push_str(note);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for DiagnosticLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Result of a HEAD probe against one endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct ProbeReport {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProbeReport {
    /// The endpoint answered at all (any status).
    pub fn is_reachable(&self) -> bool {
        self.status.is_some()
    }
}

/// Probes candidate endpoints with HEAD requests.
///
/// Best-effort: probe failures end up in the report and never become errors.
#[derive(Clone, Debug)]
pub struct DiagnosticsReporter {
    client: Client,
    timeout: Duration,
}

impl DiagnosticsReporter {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Probe every candidate in order.
    pub async fn probe(&self, candidates: &[UploadCandidate]) -> Vec<ProbeReport> {
        let mut reports = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            reports.push(self.probe_one(candidate).await);
        }
        reports
    }

    pub async fn probe_one(&self, candidate: &UploadCandidate) -> ProbeReport {
        let mut request = self.client.head(&candidate.endpoint_url);
        for (name, value) in candidate.headers() {
            request = request.header(name.as_str(), value.as_str());
        }

        let start = Instant::now();
        let result = tokio::time::timeout(self.timeout, request.send()).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, error) = match result {
            Ok(Ok(response)) => (Some(response.status().as_u16()), None),
            Ok(Err(e)) => (None, Some(e.to_string())),
            Err(_) => (
                None,
                Some(format!("Timed out after {:.1}s", self.timeout.as_secs_f64())),
            ),
        };

        tracing::debug!(
            endpoint = %candidate.endpoint_url,
            status = ?status,
            duration_ms = latency_ms,
            "Probed upload endpoint"
        );

        ProbeReport {
            name: candidate.name.clone(),
            url: candidate.endpoint_url.clone(),
            status,
            latency_ms,
            error,
        }
    }
}

/// Human-readable probe table, one line per endpoint.
pub fn render_probes(reports: &[ProbeReport]) -> String {
    let mut out = String::new();
    for report in reports {
        let outcome = match (&report.status, &report.error) {
            (Some(status), _) => format!("HTTP {}", status),
            (None, Some(error)) => format!("unreachable: {}", error),
            (None, None) => "unknown".to_string(),
        };
        out.push_str(&format!(
            "{:<20} HEAD {} -> {} ({} ms)\n",
            report.name, report.url, outcome, report.latency_ms
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(candidate: &str, outcome: AttemptOutcome, status: Option<u16>) -> AttemptRecord {
        AttemptRecord {
            candidate: candidate.to_string(),
            endpoint: format!("http://host/{}", candidate),
            started_at: Utc::now(),
            duration_ms: 5,
            status,
            outcome,
        }
    }

    #[test]
    fn transcript_lists_attempts_in_order() {
        let mut log = DiagnosticLog::new();
        log.record(record(
            "same-origin",
            AttemptOutcome::Failed {
                error: "HTTP 500: boom".to_string(),
            },
            Some(500),
        ));
        log.record(record(
            "edge-function",
            AttemptOutcome::Succeeded {
                public_url: "https://x/y/deck-abc123.pdf".to_string(),
            },
            Some(200),
        ));
        log.note("used edge function");

        let text = log.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#1 same-origin"));
        assert!(lines[0].contains("FAILED: HTTP 500: boom"));
        assert!(lines[1].starts_with("#2 edge-function"));
        assert!(lines[1].contains("OK https://x/y/deck-abc123.pdf"));
        assert_eq!(lines[2], "note: used edge function");
        assert_eq!(log.last_error(), Some("HTTP 500: boom"));
        assert_eq!(log.failures().count(), 1);
    }

    #[test]
    fn records_serialize_flat() {
        let json = serde_json::to_value(record(
            "edge",
            AttemptOutcome::Failed {
                error: "Timed out after 1.0s".to_string(),
            },
            None,
        ))
        .unwrap();
        assert_eq!(json["result"], "failed");
        assert_eq!(json["error"], "Timed out after 1.0s");
        assert!(json.get("status").is_none());
    }

    #[tokio::test]
    async fn probe_reports_status_and_unreachable_hosts() {
        let mut server = mockito::Server::new_async().await;
        let head = server
            .mock("HEAD", "/api/upload-file")
            .with_status(405)
            .create_async()
            .await;

        let reporter = DiagnosticsReporter::new()
            .unwrap()
            .with_timeout(Duration::from_secs(2));
        let reports = reporter
            .probe(&[
                UploadCandidate::multipart("same-origin", format!("{}/api/upload-file", server.url())),
                UploadCandidate::multipart("dead", "http://127.0.0.1:1/api/upload-file"),
            ])
            .await;

        head.assert_async().await;
        assert_eq!(reports[0].status, Some(405));
        assert!(reports[0].is_reachable());
        assert!(!reports[1].is_reachable());
        assert!(reports[1].error.is_some());

        let table = render_probes(&reports);
        assert!(table.contains("HTTP 405"));
        assert!(table.contains("unreachable"));
    }
}
