//! # API Configuration Module
//!
//! This module loads the Nest API server configuration from environment
//! variables and provides defaults where appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 8000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: Size of the connection pool (default: 5)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)

use eyre::{Result, WrapErr};
use std::env;
use tracing::Level;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_REQUEST_TIMEOUT: u64 = 30;

/// Settings of the Nest API server and its database pool.
///
/// ```no_run
/// # fn main() -> eyre::Result<()> {
/// let config = nest_api::config::ApiConfig::from_env()?;
/// assert!(config.database_max_connections > 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Interface to bind, `0.0.0.0` unless overridden
    pub host: String,

    pub port: u16,

    pub database_url: String,

    /// Maximum number of pooled database connections
    pub database_max_connections: u32,

    /// Maximum level the fmt subscriber prints
    pub log_level: Level,

    /// Origins allowed by CORS; `None` disables the CORS layer
    pub cors_origins: Option<Vec<String>>,

    /// Seconds before a request is answered with 408
    pub request_timeout: u64,
}

impl ApiConfig {
    /// Reads the configuration from the process environment.
    ///
    /// Fails when `DATABASE_URL` is missing or when `API_PORT` or
    /// `DATABASE_MAX_CONNECTIONS` is not a number.
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("API_PORT") {
            Ok(port) => port.parse().wrap_err("Invalid API_PORT value")?,
            Err(_) => DEFAULT_PORT,
        };

        // Database settings
        let database_url = env::var("DATABASE_URL")
            .wrap_err("DATABASE_URL environment variable must be set")?;
        let database_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(max) => max
                .parse()
                .wrap_err("Invalid DATABASE_MAX_CONNECTIONS value")?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        // Logging settings
        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS")
            .ok()
            .map(|origins| parse_origins(&origins))
            .filter(|origins| !origins.is_empty());

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|timeout| timeout.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            log_level,
            cors_origins,
            request_timeout,
        })
    }

    /// Returns the server address as a string, e.g. "127.0.0.1:8000"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Unknown levels fall back to `INFO`.
pub fn parse_log_level(level: &str) -> Level {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn parse_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
