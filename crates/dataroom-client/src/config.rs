//! Client-side endpoint configuration.

use anyhow::{Context, Result};

const DEFAULT_SITE_URL: &str = "http://localhost:4000";

/// Where the upload endpoints live.
///
/// `site_url` hosts the same-origin handlers (`/api/upload-file`), while
/// `backend_url` hosts the edge functions and object storage API.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub site_url: String,
    pub backend_url: String,
    pub anon_key: Option<String>,
    pub public_base_url: String,
}

impl ClientConfig {
    pub fn new(site_url: impl Into<String>, backend_url: impl Into<String>) -> Self {
        let site_url = trim_url(site_url.into());
        let backend_url = trim_url(backend_url.into());
        let public_base_url = format!(
            "{}{}",
            backend_url,
            dataroom_core::constants::PUBLIC_OBJECT_PREFIX
        );
        Self {
            site_url,
            backend_url,
            anon_key: None,
            public_base_url,
        }
    }

    /// Everything on one server (the bundled `dataroom-api`).
    pub fn single(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self::new(base_url.clone(), base_url)
    }

    pub fn with_anon_key(mut self, key: impl Into<String>) -> Self {
        self.anon_key = Some(key.into());
        self
    }

    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = trim_url(url.into());
        self
    }

    /// Create config from environment: DATAROOM_SITE_URL, SUPABASE_URL (or
    /// VITE_SUPABASE_URL), SUPABASE_ANON_KEY, DATAROOM_PUBLIC_BASE_URL.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let site_url = non_empty("DATAROOM_SITE_URL").unwrap_or_else(|| DEFAULT_SITE_URL.to_string());
        let backend_url = non_empty("SUPABASE_URL")
            .or_else(|| non_empty("VITE_SUPABASE_URL"))
            .unwrap_or_else(|| site_url.clone());

        for (name, value) in [("DATAROOM_SITE_URL", &site_url), ("SUPABASE_URL", &backend_url)] {
            reqwest::Url::parse(value).with_context(|| format!("{} is not a valid URL", name))?;
        }

        let mut config = Self::new(site_url, backend_url);
        if let Some(key) = non_empty("SUPABASE_ANON_KEY") {
            config = config.with_anon_key(key);
        }
        if let Some(url) = non_empty("DATAROOM_PUBLIC_BASE_URL") {
            config = config.with_public_base_url(url);
        }
        Ok(config)
    }

    pub fn site_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.site_url, path)
    }

    pub fn backend_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.backend_url, path)
    }

    /// Headers the hosted backend expects on anonymous calls.
    pub fn backend_headers(&self) -> Vec<(String, String)> {
        match &self.anon_key {
            Some(key) => vec![
                ("apikey".to_string(), key.clone()),
                ("Authorization".to_string(), format!("Bearer {}", key)),
            ],
            None => Vec::new(),
        }
    }
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
