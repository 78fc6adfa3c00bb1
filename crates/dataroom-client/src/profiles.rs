//! Preset endpoint lists, limits and timeouts per kind of upload.

use crate::candidate::UploadCandidate;
use crate::config::ClientConfig;
use crate::sequencer::{AcceptList, FallbackSequencer, TimeoutPolicy, DEFAULT_MAX_SIZE};
use anyhow::Result;
use dataroom_core::constants::{
    DEFAULT_LOGO_BUCKET, DEFAULT_UPLOAD_BUCKET, EDGE_UPLOAD_FILE_PATH, EDGE_UPLOAD_LOGO_PATH,
    LEGACY_UPLOAD_FILE_PATH, OBJECT_PREFIX, UPLOAD_FILE_PATH,
};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const LOGO_CONTENT_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];
const LOGO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadProfile {
    /// PDF pitch decks.
    Document,
    /// Investment logos.
    Logo,
    /// Anything else.
    General,
}

impl UploadProfile {
    pub const ALL: [UploadProfile; 3] = [
        UploadProfile::Document,
        UploadProfile::Logo,
        UploadProfile::General,
    ];

    pub fn accept_list(&self) -> AcceptList {
        match self {
            UploadProfile::Document => AcceptList::only(&["application/pdf"], &["pdf"]),
            UploadProfile::Logo => AcceptList::only(LOGO_CONTENT_TYPES, LOGO_EXTENSIONS),
            UploadProfile::General => AcceptList::Any,
        }
    }

    pub fn max_size(&self) -> usize {
        DEFAULT_MAX_SIZE
    }

    pub fn timeout_policy(&self) -> TimeoutPolicy {
        match self {
            UploadProfile::Document => TimeoutPolicy::SizeScaled {
                base: Duration::from_secs(15),
                per_mb: Duration::from_secs(5),
                max: Duration::from_secs(60),
            },
            UploadProfile::Logo | UploadProfile::General => TimeoutPolicy::default(),
        }
    }

    /// UrlBoard slot successful uploads are published to.
    pub fn board_slot(&self) -> &'static str {
        match self {
            UploadProfile::Document => "deck_url",
            UploadProfile::Logo => "logo_url",
            UploadProfile::General => "file_url",
        }
    }

    /// Ordered fallback endpoints.
    pub fn candidates(&self, config: &ClientConfig) -> Vec<UploadCandidate> {
        let backend_headers = config.backend_headers();
        let edge = |name: &str, path: &str| {
            UploadCandidate::multipart(name, config.backend_endpoint(path))
                .with_headers(backend_headers.clone())
        };
        let direct = |bucket: &str| {
            UploadCandidate::direct_object(
                "direct-object",
                config.backend_endpoint(OBJECT_PREFIX),
                bucket,
                config.public_base_url.clone(),
            )
            .with_headers(backend_headers.clone())
        };
        let same_origin =
            || UploadCandidate::multipart("same-origin", config.site_endpoint(UPLOAD_FILE_PATH));

        match self {
            UploadProfile::Document => vec![
                same_origin(),
                UploadCandidate::multipart(
                    "legacy-php",
                    config.site_endpoint(LEGACY_UPLOAD_FILE_PATH),
                ),
                edge("edge-function", EDGE_UPLOAD_FILE_PATH),
            ],
            UploadProfile::Logo => vec![
                edge("logo-edge-function", EDGE_UPLOAD_LOGO_PATH),
                direct(DEFAULT_LOGO_BUCKET),
            ],
            UploadProfile::General => vec![
                direct(DEFAULT_UPLOAD_BUCKET),
                edge("edge-function", EDGE_UPLOAD_FILE_PATH),
                same_origin(),
            ],
        }
    }

    /// A sequencer configured for this profile.
    pub fn sequencer(&self, config: &ClientConfig) -> Result<FallbackSequencer> {
        Ok(FallbackSequencer::new(self.candidates(config))?
            .with_max_size(self.max_size())
            .with_accept(self.accept_list())
            .with_timeout_policy(self.timeout_policy()))
    }
}

impl fmt::Display for UploadProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UploadProfile::Document => "document",
            UploadProfile::Logo => "logo",
            UploadProfile::General => "general",
        };
        f.write_str(name)
    }
}

impl FromStr for UploadProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "document" | "deck" | "pdf" => Ok(UploadProfile::Document),
            "logo" => Ok(UploadProfile::Logo),
            "general" | "file" => Ok(UploadProfile::General),
            other => Err(format!(
                "unknown profile '{}', expected document, logo or general",
                other
            )),
        }
    }
}
