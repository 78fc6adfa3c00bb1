//! Application state shared by all handlers.

use dataroom_core::Config;
use dataroom_storage::Storage;
use std::sync::Arc;

/// Upload limits and bucket routing derived from configuration.
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub upload_bucket: String,
    pub logo_bucket: String,
    pub max_file_size: usize,
}

impl UploadConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            upload_bucket: config.upload_bucket().to_string(),
            logo_bucket: config.logo_bucket().to_string(),
            max_file_size: config.max_file_size_bytes(),
        }
    }

    /// Whether `bucket` accepts writes.
    pub fn is_known_bucket(&self, bucket: &str) -> bool {
        bucket == self.upload_bucket || bucket == self.logo_bucket
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub uploads: UploadConfig,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        let uploads = UploadConfig::from_config(&config);
        Self {
            config,
            storage,
            uploads,
        }
    }
}
