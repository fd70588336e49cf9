//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MARIGOLD_API_BASE_URL` - Base URL of the storefront backend
//!
//! ## Optional
//! - `MARIGOLD_CREDENTIAL_DIR` - Directory for the durable credential file
//!   (default: `.marigold`)
//! - `MARIGOLD_SPLASH_DELAY_MS` - Cosmetic delay before startup routing in
//!   the admin-facing variant (default: 0)
//! - `GEOCODE_BASE_URL` - Reverse-geocoding API base URL
//!   (default: `https://api.opencagedata.com/geocode/v1`)
//! - `GEOCODE_API_KEY` - Reverse-geocoding API key; address prefill is
//!   unavailable without it

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
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

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the storefront backend.
    pub api_base_url: Url,
    /// Directory holding the durable credential file.
    pub credential_dir: PathBuf,
    /// Cosmetic splash delay before startup routing.
    pub splash_delay: Duration,
    /// Reverse-geocoding configuration, when an API key is present.
    pub geocode: Option<GeocodeConfig>,
}

/// Reverse-geocoding API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeocodeConfig {
    /// Geocoding API base URL.
    pub base_url: Url,
    /// Geocoding API key.
    pub api_key: SecretString,
}

impl std::fmt::Debug for GeocodeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl ClientConfig {
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

        let api_base_url = parse_url("MARIGOLD_API_BASE_URL", &get_required_env("MARIGOLD_API_BASE_URL")?)?;

        let credential_dir = PathBuf::from(get_env_or_default("MARIGOLD_CREDENTIAL_DIR", ".marigold"));

        let splash_delay_ms = get_env_or_default("MARIGOLD_SPLASH_DELAY_MS", "0")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("MARIGOLD_SPLASH_DELAY_MS".to_string(), e.to_string())
            })?;

        let geocode = GeocodeConfig::from_env()?;

        Ok(Self {
            api_base_url,
            credential_dir,
            splash_delay: Duration::from_millis(splash_delay_ms),
            geocode,
        })
    }
}

impl GeocodeConfig {
    /// Geocode configuration is optional: without an API key, address
    /// prefill from GPS is simply unavailable.
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(api_key) = get_optional_env("GEOCODE_API_KEY") else {
            return Ok(None);
        };

        let base_url = parse_url(
            "GEOCODE_BASE_URL",
            &get_env_or_default("GEOCODE_BASE_URL", "https://api.opencagedata.com/geocode/v1"),
        )?;

        Ok(Some(Self {
            base_url,
            api_key: SecretString::from(api_key),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a URL-valued variable.
fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
