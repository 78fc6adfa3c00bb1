//! Dataroom Core Library
//!
//! Configuration, error types and wire models shared by the upload service,
//! the storage backends and the fallback client.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod naming;
pub mod storage_types;

// Re-export commonly used types
pub use config::{Config, ServerConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
