//! Kiosk configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `VITRINE_REMOTE_DOC_ID` - Id of the published store document
//!
//! ## Optional
//! - `VITRINE_KIOSK_HOST` - Bind address (default: 127.0.0.1)
//! - `VITRINE_KIOSK_PORT` - Listen port (default: 3200)
//! - `VITRINE_DATA_DIR` - Directory for the local cache store
//!   (default: the platform data dir + `vitrine`)
//! - `VITRINE_DOCSTORE_BASE_URL` - Remote document store base URL
//!   (default: `https://api.jsonbin.io/v3/b`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Default base URL of the hosted JSON document store.
pub const DEFAULT_DOCSTORE_BASE_URL: &str = "https://api.jsonbin.io/v3/b";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Cannot determine a data directory; set VITRINE_DATA_DIR")]
    NoDataDir,
}

/// Kiosk application configuration.
#[derive(Debug, Clone)]
pub struct KioskConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the local cache store
    pub data_dir: PathBuf,
    /// Remote document store base URL
    pub docstore_base_url: String,
    /// Id of the published store document (read-only access)
    pub remote_doc_id: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl KioskConfig {
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

        let host = get_env_or_default("VITRINE_KIOSK_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("VITRINE_KIOSK_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("VITRINE_KIOSK_PORT", "3200")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("VITRINE_KIOSK_PORT".to_string(), e.to_string())
            })?;
        let data_dir = data_dir_from_env()?;
        let docstore_base_url =
            get_env_or_default("VITRINE_DOCSTORE_BASE_URL", DEFAULT_DOCSTORE_BASE_URL);
        let remote_doc_id = get_required_env("VITRINE_REMOTE_DOC_ID")?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            data_dir,
            docstore_base_url,
            remote_doc_id,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Path of the kiosk's local cache store file.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("kiosk.redb")
    }
}

/// Resolve the data directory: env override, else the platform data dir.
fn data_dir_from_env() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var("VITRINE_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_local_dir()
        .map(|base| base.join("vitrine"))
        .ok_or(ConfigError::NoDataDir)
}

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
