//! Checkout configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STONELINE_COMMERCE_URL` - Base URL of the remote commerce API
//! - `STONELINE_COMMERCE_TOKEN` - API access token (server-side only)
//!
//! ## Optional
//! - `STONELINE_COMMERCE_API_VERSION` - API version path segment (default: v1)
//! - `STONELINE_REQUEST_TIMEOUT_SECS` - Client-wide request timeout (default: 30)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_API_VERSION: &str = "v1";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Checkout application configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Remote commerce API configuration.
    pub commerce: CommerceApiConfig,
}

/// Remote commerce API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct CommerceApiConfig {
    /// Base URL, e.g. `https://api.example-tiles.com`.
    pub base_url: String,
    /// API version path segment, e.g. `v1`.
    pub api_version: String,
    /// API access token (server-side only).
    pub api_token: SecretString,
    /// One fixed timeout for every request; no per-operation tuning.
    pub request_timeout: Duration,
}

impl std::fmt::Debug for CommerceApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommerceApiConfig")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("api_token", &"[REDACTED]")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads a `.env` file first if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a numeric
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let base_url = require_env("STONELINE_COMMERCE_URL")?;
        let api_token = SecretString::from(require_env("STONELINE_COMMERCE_TOKEN")?);
        let api_version = std::env::var("STONELINE_COMMERCE_API_VERSION")
            .unwrap_or_else(|_| DEFAULT_API_VERSION.to_string());
        let timeout_secs = parse_env_or(
            "STONELINE_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;

        Ok(Self {
            commerce: CommerceApiConfig {
                base_url,
                api_version,
                api_token,
                request_timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn parse_env_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar(name.to_string(), raw)),
        Err(_) => Ok(default),
    }
}
