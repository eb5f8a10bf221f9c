//! Runtime configuration
//!
//! Defaults match the production API; the CLI (and its environment variables)
//! can override each setting.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::api::{RetryPolicy, BASE_URL};
use crate::cache::CACHE_TTL;
use crate::cli::Cli;

/// Error types for configuration built from CLI arguments
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL is not an http(s) URL
    #[error("Invalid base URL: '{0}'. Expected an http:// or https:// URL")]
    InvalidBaseUrl(String),
}

/// Settings shared by the API client, cache and cart
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Prefix for every API path, without a trailing slash
    pub base_url: String,
    /// Default retry behaviour for requests
    pub retry: RetryPolicy,
    /// How long cached responses stay fresh
    pub cache_ttl: Duration,
    /// Where to persist data; the platform data directory when `None`
    pub store_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            retry: RetryPolicy::default(),
            cache_ttl: CACHE_TTL,
            store_dir: None,
        }
    }
}

impl Config {
    /// Creates a Config from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(Config)` with defaults for anything not given
    /// * `Err(ConfigError)` if the base URL is unusable
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(base_url) = &cli.base_url {
            let trimmed = base_url.trim().trim_end_matches('/');
            let valid = ["http://", "https://"]
                .iter()
                .any(|scheme| trimmed.len() > scheme.len() && trimmed.starts_with(scheme));
            if !valid {
                return Err(ConfigError::InvalidBaseUrl(base_url.clone()));
            }
            config.base_url = trimmed.to_string();
        }

        config.retry = config.retry.with_overrides(
            cli.retries,
            cli.retry_delay_ms.map(Duration::from_millis),
        );
        config.store_dir = cli.store_dir.clone();

        Ok(config)
    }
}
