//! Storage setup and initialization

use anyhow::{Context, Result};
use dataroom_core::Config;
use dataroom_storage::{create_storage, Storage};
use std::sync::Arc;

/// Create the configured storage backend.
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage abstraction...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;
    tracing::info!(
        backend = %storage.backend_type(),
        upload_bucket = %config.upload_bucket(),
        logo_bucket = %config.logo_bucket(),
        "Storage abstraction initialized successfully"
    );
    Ok(storage)
}
