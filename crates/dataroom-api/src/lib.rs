//! Dataroom API Library
//!
//! HTTP upload service: multipart upload handlers, raw object writes, public
//! object serving and application setup.

mod api_doc;
mod handlers;
mod telemetry;
mod utils;

pub mod error;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
