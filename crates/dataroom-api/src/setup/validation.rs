//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use dataroom_core::Config;

/// Validate critical configuration values
///
/// Runs the config's own checks, then warns about settings that are legal
/// but worth an operator's attention.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.cors_origins().iter().any(|o| o == "*") {
        if config.is_production() {
            tracing::warn!(
                "CORS allows all origins (*) in production; set CORS_ORIGINS to restrict upload callers"
            );
        } else {
            tracing::debug!("CORS allows all origins (*)");
        }
    }

    if config.max_file_size_bytes() > 100 * 1024 * 1024 {
        tracing::warn!(
            max_file_size_bytes = config.max_file_size_bytes(),
            "Upload limit is above 100 MB; files are buffered in memory"
        );
    }

    tracing::info!("Configuration validation passed");
    Ok(())
}
