//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MAPLEFRONT_API_URL` - Base URL of the remote storefront API
//!
//! ## Optional
//! - `MAPLEFRONT_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 10)

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin workflow configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Base URL of the remote storefront API
    pub api_url: Url,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let api_url = std::env::var("MAPLEFRONT_API_URL")
            .map_err(|_| ConfigError::MissingEnvVar("MAPLEFRONT_API_URL".to_string()))?;
        let api_url = Url::parse(&api_url).map_err(|e| {
            ConfigError::InvalidEnvVar("MAPLEFRONT_API_URL".to_string(), e.to_string())
        })?;

        let http_timeout = std::env::var("MAPLEFRONT_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "MAPLEFRONT_HTTP_TIMEOUT_SECS".to_string(),
                    e.to_string(),
                )
            })?;

        Ok(Self {
            api_url,
            http_timeout,
        })
    }
}
