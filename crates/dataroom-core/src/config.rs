//! Configuration module
//!
//! Server configuration for the upload service: listen port, CORS, storage
//! backend selection, bucket names and upload limits.

use std::env;

use crate::constants::{
    BODY_LIMIT_SLACK_BYTES, DEFAULT_LOGO_BUCKET, DEFAULT_MAX_FILE_SIZE_MB, DEFAULT_UPLOAD_BUCKET,
    PUBLIC_OBJECT_PREFIX,
};
use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 4000;
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Upload service configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub local_storage_path: String,
    pub public_base_url: String,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    // Buckets
    pub upload_bucket: String,
    pub logo_bucket: String,
    // Limits
    pub max_file_size_bytes: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServerConfig>);

impl Config {
    fn inner(&self) -> &ServerConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServerConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.inner().environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().server_port
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().cors_origins
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.inner().request_timeout_secs
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn local_storage_path(&self) -> &str {
        &self.inner().local_storage_path
    }

    pub fn public_base_url(&self) -> &str {
        &self.inner().public_base_url
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn upload_bucket(&self) -> &str {
        &self.inner().upload_bucket
    }

    pub fn logo_bucket(&self) -> &str {
        &self.inner().logo_bucket
    }

    /// Buckets that accept writes.
    pub fn buckets(&self) -> [&str; 2] {
        [self.upload_bucket(), self.logo_bucket()]
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().max_file_size_bytes
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let server_port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            None => SERVER_PORT,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(backend) => backend.parse()?,
            None => StorageBackend::Local,
        };

        let max_file_size_mb = lookup("MAX_FILE_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB);
        let max_file_size_bytes = max_file_size_mb.checked_mul(1024 * 1024).ok_or_else(|| {
            anyhow::anyhow!("MAX_FILE_SIZE_MB is too large: {}", max_file_size_mb)
        })?;

        let config = ServerConfig {
            server_port,
            environment,
            cors_origins,
            request_timeout_secs: lookup("REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(REQUEST_TIMEOUT_SECS)
                .max(1),
            storage_backend,
            local_storage_path: lookup("LOCAL_STORAGE_PATH")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "./storage".to_string()),
            public_base_url: lookup("PUBLIC_BASE_URL")
                .or_else(|| lookup("LOCAL_STORAGE_BASE_URL"))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| {
                    format!("http://localhost:{}{}", server_port, PUBLIC_OBJECT_PREFIX)
                }),
            s3_bucket: lookup("S3_BUCKET").filter(|s| !s.is_empty()),
            s3_region: lookup("S3_REGION").filter(|s| !s.is_empty()),
            s3_endpoint: lookup("S3_ENDPOINT").filter(|s| !s.is_empty()),
            aws_region: lookup("AWS_REGION").filter(|s| !s.is_empty()),
            upload_bucket: lookup("UPLOAD_BUCKET")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_UPLOAD_BUCKET.to_string()),
            logo_bucket: lookup("LOGO_BUCKET")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_LOGO_BUCKET.to_string()),
            max_file_size_bytes,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.max_file_size_bytes.checked_add(BODY_LIMIT_SLACK_BYTES).is_none() {
            return Err(anyhow::anyhow!(
                "MAX_FILE_SIZE_MB is too large: {} bytes",
                self.max_file_size_bytes
            ));
        }

        for bucket in [&self.upload_bucket, &self.logo_bucket] {
            if bucket.contains('/') || bucket.contains("..") {
                return Err(anyhow::anyhow!("Invalid bucket name: {}", bucket));
            }
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if !self.public_base_url.starts_with("http://")
                    && !self.public_base_url.starts_with("https://")
                {
                    return Err(anyhow::anyhow!(
                        "PUBLIC_BASE_URL must be an absolute http(s) URL"
                    ));
                }
            }
        }

        Ok(())
    }
}
