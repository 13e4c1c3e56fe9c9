//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BAZAAR_API_BASE_URL` - Backend API base URL (default: `http://localhost:8000/api`)
//! - `BAZAAR_STATE_DIR` - Directory holding the persisted client state (default: `.bazaar`)
//! - `BAZAAR_REQUEST_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)
//! - `BAZAAR_GOOGLE_CLIENT_ID` - Google Identity Services client ID
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Default backend location used by local development setups.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

const DEFAULT_STATE_DIR: &str = ".bazaar";
const DEFAULT_REQUEST_TIMEOUT_SECS: &str = "30";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// Backend API base URL, e.g. `https://shop.example/api`
    pub api_base_url: Url,
    /// Directory for the persisted client state file
    pub state_dir: PathBuf,
    /// Timeout applied to every API request
    pub request_timeout: Duration,
    /// Google Identity Services client ID
    pub google_client_id: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("state_dir", &self.state_dir)
            .field("request_timeout", &self.request_timeout)
            .field(
                "google_client_id",
                &self.google_client_id.as_ref().map(|_| "[REDACTED]"),
            )
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_base_url(
            "BAZAAR_API_BASE_URL",
            &get_env_or_default("BAZAAR_API_BASE_URL", DEFAULT_API_BASE_URL),
        )?;
        let state_dir = PathBuf::from(get_env_or_default("BAZAAR_STATE_DIR", DEFAULT_STATE_DIR));
        let timeout_secs = get_env_or_default(
            "BAZAAR_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("BAZAAR_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_base_url,
            state_dir,
            request_timeout: Duration::from_secs(timeout_secs),
            google_client_id: get_optional_env("BAZAAR_GOOGLE_CLIENT_ID").map(SecretString::from),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }

    /// Configuration pointing at the given API, with defaults for the rest.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL cannot be parsed.
    pub fn for_api(api_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_base_url("api_base_url", api_base_url)?,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            request_timeout: Duration::from_secs(30),
            google_client_id: None,
            sentry_dsn: None,
        })
    }

    /// Client ID the Google sign-in button is initialized with.
    #[must_use]
    pub fn identity_client_id(&self) -> Option<&str> {
        self.google_client_id.as_ref().map(ExposeSecret::expose_secret)
    }

    /// Path of the JSON file backing persistent storage.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.state_dir.join("storage.json")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a base URL, normalizing it to end with a slash so relative joins
/// keep the last path segment (`/api` + `products` → `/api/products`).
fn parse_base_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "URL cannot be used as a base".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}
