//! Configuration management for the MCP server.
//!
//! All configuration comes from environment variables (a `.env` file is
//! honored via dotenvy). The only required value is the Rebillia API key.

use serde::{Deserialize, Serialize};

use super::error::{Error, Result};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Upstream Rebillia API configuration.
    pub api: ApiConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Upstream Rebillia API configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Account API key, sent as the `X-AUTH-TOKEN` header.
    pub api_key: String,

    /// Base URL every request path is resolved against.
    pub base_url: String,
}

/// Custom Debug implementation to redact the API key from logs.
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails when `REBILLIA_API_KEY` is missing; every other variable has a
    /// default (`REBILLIA_API_URL`, `REBILLIA_LOG_LEVEL`).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var("REBILLIA_API_KEY")
            .map_err(|_| Error::config("REBILLIA_API_KEY environment variable is required"))?;
        let base_url = std::env::var("REBILLIA_API_URL")
            .unwrap_or_else(|_| crate::core::client::DEFAULT_BASE_URL.to_string());
        let level = std::env::var("REBILLIA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            server: ServerConfig {
                name: "rebillia-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            api: ApiConfig { api_key, base_url },
            logging: LoggingConfig { level },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_from_env_requires_api_key() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("REBILLIA_API_KEY");
        }
        let result = Config::from_env();
        assert!(result.is_err());
    }

    #[test]
    fn test_from_env_applies_defaults() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("REBILLIA_API_KEY", "test_key_12345");
            std::env::remove_var("REBILLIA_API_URL");
            std::env::remove_var("REBILLIA_LOG_LEVEL");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.api.base_url, "https://api.rebillia.com/v1");
        assert_eq!(config.logging.level, "info");
        unsafe {
            std::env::remove_var("REBILLIA_API_KEY");
        }
    }

    #[test]
    fn test_base_url_override() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("REBILLIA_API_KEY", "test_key_12345");
            std::env::set_var("REBILLIA_API_URL", "http://localhost:9999/v1");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.api.base_url, "http://localhost:9999/v1");
        unsafe {
            std::env::remove_var("REBILLIA_API_KEY");
            std::env::remove_var("REBILLIA_API_URL");
        }
    }

    #[test]
    fn test_api_key_redacted_in_debug() {
        let api = ApiConfig {
            api_key: "super_secret_key".to_string(),
            base_url: "https://api.rebillia.com/v1".to_string(),
        };
        let debug_str = format!("{:?}", api);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
    }
}
