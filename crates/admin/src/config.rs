//! Admin console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `VITRINE_ADMIN_HOST` - Bind address (default: 127.0.0.1)
//! - `VITRINE_ADMIN_PORT` - Listen port (default: 3100)
//! - `VITRINE_DATA_DIR` - Directory for the local document store
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
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Cannot determine a data directory; set VITRINE_DATA_DIR")]
    NoDataDir,
}

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the local document store
    pub data_dir: PathBuf,
    /// Remote document store base URL
    pub docstore_base_url: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or no
    /// data directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("VITRINE_ADMIN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("VITRINE_ADMIN_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("VITRINE_ADMIN_PORT", "3100")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("VITRINE_ADMIN_PORT".to_string(), e.to_string())
            })?;
        let data_dir = data_dir_from_env()?;
        let docstore_base_url =
            get_env_or_default("VITRINE_DOCSTORE_BASE_URL", DEFAULT_DOCSTORE_BASE_URL);
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            data_dir,
            docstore_base_url,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Path of the admin's local document store file.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("admin.redb")
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

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = AdminConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3100,
            data_dir: PathBuf::from("/tmp/vitrine-test"),
            docstore_base_url: DEFAULT_DOCSTORE_BASE_URL.to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3100);
    }

    #[test]
    fn test_store_path_is_inside_data_dir() {
        let config = AdminConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3100,
            data_dir: PathBuf::from("/tmp/vitrine-test"),
            docstore_base_url: DEFAULT_DOCSTORE_BASE_URL.to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        assert_eq!(
            config.store_path(),
            PathBuf::from("/tmp/vitrine-test/admin.redb")
        );
    }
}
