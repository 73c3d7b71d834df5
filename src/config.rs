//! Configuration management for the market proxy.
//!
//! Runtime knobs (listen port, request timeout) come from environment
//! variables. The upstream exchange, trading pair, cache window, and CORS
//! allow-list are deliberately fixed constants: this proxy serves exactly one
//! pair from exactly one exchange.

use crate::error::{ConfigError, ConfigResult};
use std::env;

/// Base URL of the upstream exchange REST API.
pub const BINANCE_BASE_URL: &str = "https://api.binance.com";

/// The single trading pair this proxy serves.
pub const SYMBOL: &str = "SHIBUSDT";

/// How long a cached upstream response stays fresh, in milliseconds.
pub const CACHE_DURATION_MS: u64 = 5000;

/// Frontend origins allowed by the CORS layer.
pub const ALLOWED_ORIGINS: &[&str] = &["https://dubplanet.github.io", "http://localhost:3000"];

/// Configuration for the market proxy server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// Upstream API base URL (constant in production, overridable in tests)
    pub upstream_base_url: String,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// Deployment environment label, echoed by /health (default: "development")
    pub env: String,

    /// Log level (default: "info")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `PORT`: Listen port (default: 3000)
    /// - `REQUEST_TIMEOUT`: Upstream HTTP timeout in seconds (default: 10)
    /// - `APP_ENV`: Environment label (default: "development")
    /// - `LOG_LEVEL`: Logging level (default: "info")
    pub fn from_env() -> ConfigResult<Self> {
        // Try to load .env file if it exists (but don't fail if it doesn't)
        let _ = dotenvy::dotenv();

        let port = Self::parse_env_u16("PORT", 3000)?;
        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;
        let env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            port,
            upstream_base_url: BINANCE_BASE_URL.to_string(),
            request_timeout,
            env,
            log_level,
        })
    }

    /// Override the upstream base URL (useful for testing against a mock server).
    #[doc(hidden)]
    pub fn with_upstream_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.upstream_base_url = base_url.into();
        self
    }

    /// Parse an environment variable as u16 with a default value.
    fn parse_env_u16(var_name: &str, default: u16) -> ConfigResult<u16> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a number between 0-65535, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 3000,
            upstream_base_url: BINANCE_BASE_URL.to_string(),
            request_timeout: 10,
            env: "development".to_string(),
            log_level: "info".to_string(),
        }
    }
}
