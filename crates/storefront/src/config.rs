//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MAPLEFRONT_API_URL` - Base URL of the remote storefront API
//!
//! ## Optional
//! - `MAPLEFRONT_STATE_DIR` - Directory for durable client state
//!   (default: .maplefront)
//! - `MAPLEFRONT_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 10)

use std::path::PathBuf;
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

/// Storefront state core configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the remote storefront API
    pub api_url: Url,
    /// Directory holding durable client state (currency preference)
    pub state_dir: PathBuf,
    /// Per-request HTTP timeout
    pub http_timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_env("MAPLEFRONT_API_URL")?;
        let api_url = Url::parse(&api_url).map_err(|e| {
            ConfigError::InvalidEnvVar("MAPLEFRONT_API_URL".to_string(), e.to_string())
        })?;

        let state_dir = PathBuf::from(get_env_or_default("MAPLEFRONT_STATE_DIR", ".maplefront"));

        let http_timeout = get_env_or_default("MAPLEFRONT_HTTP_TIMEOUT_SECS", "10")
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
            state_dir,
            http_timeout,
        })
    }

    /// Path of the file backing durable preferences.
    #[must_use]
    pub fn preferences_path(&self) -> PathBuf {
        self.state_dir.join("preferences.json")
    }

    /// Path of the file backing the vendor session.
    ///
    /// Embedders with a real session scope (a browser tab, a daemon
    /// lifetime) should prefer an in-memory port; a file keeps the CLI's
    /// invocations stitched into one session.
    #[must_use]
    pub fn session_path(&self) -> PathBuf {
        self.state_dir.join("session.json")
    }
}

/// Get a required environment variable.
fn get_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
