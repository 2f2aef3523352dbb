//! Catalog engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MAKOLA_REMOTE_BASE_URL` - Base URL of the remote store API
//! - `MAKOLA_REMOTE_API_KEY` - API key for the remote store
//!
//! ## Optional
//! - `MAKOLA_FETCH_TIMEOUT_SECS` - Per-attempt fetch deadline (default: 10)
//! - `MAKOLA_FETCH_RETRIES` - Retry attempts after the first failure (default: 3)
//! - `MAKOLA_POLL_INTERVAL_SECS` - Subscription poll interval (default: 5)
//!
//! The timeout/retry numbers are tuning defaults, not contracts; deployments
//! override them per environment.

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FETCH_RETRIES: u32 = 3;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Catalog engine configuration.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Base URL of the remote store API.
    pub remote_base_url: Url,
    /// API key sent with every remote request.
    pub remote_api_key: SecretString,
    /// Deadline for a single fetch attempt.
    pub fetch_timeout: Duration,
    /// Retry attempts after the first failure.
    pub fetch_retries: u32,
    /// How often the live subscription re-polls the remote store.
    pub poll_interval: Duration,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("remote_base_url", &self.remote_base_url.as_str())
            .field("remote_api_key", &"[REDACTED]")
            .field("fetch_timeout", &self.fetch_timeout)
            .field("fetch_retries", &self.fetch_retries)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `.env` via `dotenvy` first, so local development works without
    /// exporting anything.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value fails
    /// to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let base_url = require("MAKOLA_REMOTE_BASE_URL")?;
        let remote_base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("MAKOLA_REMOTE_BASE_URL".to_owned(), e.to_string())
        })?;

        let remote_api_key = SecretString::from(require("MAKOLA_REMOTE_API_KEY")?);

        Ok(Self {
            remote_base_url,
            remote_api_key,
            fetch_timeout: Duration::from_secs(optional_u64(
                "MAKOLA_FETCH_TIMEOUT_SECS",
                DEFAULT_FETCH_TIMEOUT_SECS,
            )?),
            fetch_retries: u32::try_from(optional_u64(
                "MAKOLA_FETCH_RETRIES",
                u64::from(DEFAULT_FETCH_RETRIES),
            )?)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("MAKOLA_FETCH_RETRIES".to_owned(), e.to_string())
            })?,
            poll_interval: Duration::from_secs(optional_u64(
                "MAKOLA_POLL_INTERVAL_SECS",
                DEFAULT_POLL_INTERVAL_SECS,
            )?),
        })
    }
}

fn require(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

fn optional_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar(name.to_owned(), value)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let config = CatalogConfig {
            remote_base_url: Url::parse("https://store.example.com").unwrap(),
            remote_api_key: SecretString::from("super-secret".to_owned()),
            fetch_timeout: Duration::from_secs(10),
            fetch_retries: 3,
            poll_interval: Duration::from_secs(5),
        };
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
    }

    // Environment mutation is process-global, so all from_env paths run in
    // one sequential test.
    #[test]
    #[allow(unsafe_code)]
    fn from_env_reports_missing_and_invalid_values() {
        unsafe {
            std::env::remove_var("MAKOLA_REMOTE_BASE_URL");
            std::env::remove_var("MAKOLA_REMOTE_API_KEY");
            std::env::remove_var("MAKOLA_FETCH_RETRIES");
        }
        let err = CatalogConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref name) if name == "MAKOLA_REMOTE_BASE_URL"));

        unsafe {
            std::env::set_var("MAKOLA_REMOTE_BASE_URL", "not a url");
            std::env::set_var("MAKOLA_REMOTE_API_KEY", "test-key");
        }
        let err = CatalogConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref name, _) if name == "MAKOLA_REMOTE_BASE_URL"));

        unsafe {
            std::env::set_var("MAKOLA_REMOTE_BASE_URL", "https://store.example.com");
            std::env::set_var("MAKOLA_FETCH_RETRIES", "many");
        }
        let err = CatalogConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref name, _) if name == "MAKOLA_FETCH_RETRIES"));

        unsafe {
            std::env::remove_var("MAKOLA_FETCH_RETRIES");
        }
        let config = CatalogConfig::from_env().unwrap();
        assert_eq!(config.remote_base_url.as_str(), "https://store.example.com/");
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.fetch_retries, 3);

        unsafe {
            std::env::remove_var("MAKOLA_REMOTE_BASE_URL");
            std::env::remove_var("MAKOLA_REMOTE_API_KEY");
        }
    }
}
