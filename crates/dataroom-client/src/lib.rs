//! Upload client with endpoint fallback.
//!
//! A [`FallbackSequencer`] walks an ordered list of [`UploadCandidate`]s
//! (same-origin handler, edge function, direct object write) and stops at the
//! first one that stores the file and yields a public URL. Every attempt is
//! recorded in a [`DiagnosticLog`]; [`DiagnosticsReporter`] probes endpoints
//! with HEAD requests for operators.
//!
//! [`UploadProfile`] bundles the endpoint lists, limits and timeouts used for
//! decks, logos and general files.

pub mod attempt;
pub mod board;
pub mod candidate;
pub mod config;
pub mod diagnostics;
pub mod file;
pub mod profiles;
pub mod sequencer;
pub mod session;

pub use attempt::{AttemptError, AttemptSuccess, UploadAttempt};
pub use board::UrlBoard;
pub use candidate::{Transport, UploadCandidate};
pub use config::ClientConfig;
pub use diagnostics::{
    render_probes, AttemptOutcome, AttemptRecord, DiagnosticLog, DiagnosticsReporter, ProbeReport,
};
pub use file::UploadFile;
pub use profiles::UploadProfile;
pub use sequencer::{
    AcceptList, FallbackSequencer, PreflightError, TimeoutPolicy, UploadResult,
};
pub use session::{SessionObject, SessionObjects};
