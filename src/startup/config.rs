//! Client configuration.
//!
//! Defaults suit a local development server; every field can be overridden
//! through `PREPEXAM_*` environment variables or the builder methods.
//!
//! ```ignore
//! use prepexam::startup::ClientConfig;
//!
//! let config = ClientConfig::from_env()?
//!     .with_tick(std::time::Duration::from_millis(250));
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::auth::CredentialsManager;

pub const API_URL_ENV: &str = "PREPEXAM_API_URL";
pub const HTTP_TIMEOUT_ENV: &str = "PREPEXAM_HTTP_TIMEOUT_SECS";
pub const CREDENTIALS_PATH_ENV: &str = "PREPEXAM_CREDENTIALS_PATH";
pub const TICK_MILLIS_ENV: &str = "PREPEXAM_TICK_MILLIS";

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TICK_MILLIS: u64 = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },

    #[error("Could not determine the home directory; set {CREDENTIALS_PATH_ENV}")]
    NoHomeDirectory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the exam service, without trailing slash.
    pub api_url: String,
    /// Transport timeout for each HTTP call.
    pub http_timeout: Duration,
    /// Where the access token and cached user are stored.
    pub credentials_path: Option<PathBuf>,
    /// Wall time of one session clock second.
    pub tick: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            credentials_path: None,
            tick: Duration::from_millis(DEFAULT_TICK_MILLIS),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get(API_URL_ENV) {
            config = config.with_api_url(url.trim());
        }
        if let Some(secs) = get(HTTP_TIMEOUT_ENV) {
            config.http_timeout = Duration::from_secs(parse_positive(HTTP_TIMEOUT_ENV, &secs)?);
        }
        if let Some(path) = get(CREDENTIALS_PATH_ENV) {
            config.credentials_path = Some(PathBuf::from(path));
        }
        if let Some(millis) = get(TICK_MILLIS_ENV) {
            config.tick = Duration::from_millis(parse_positive(TICK_MILLIS_ENV, &millis)?);
        }

        Ok(config)
    }

    /// Configured credentials path, or the default under the home directory.
    pub fn resolve_credentials_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.credentials_path {
            Some(path) => Ok(path.clone()),
            None => CredentialsManager::default_path().ok_or(ConfigError::NoHomeDirectory),
        }
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}
