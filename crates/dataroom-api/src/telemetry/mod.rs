//! Tracing setup for the upload service.

mod init;

pub use init::init_telemetry;
