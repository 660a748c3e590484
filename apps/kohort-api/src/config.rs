//! Environment-driven configuration.
//!
//! Fail-fast: a missing `DATABASE_URL` aborts startup with a clear message
//! instead of failing on the first query.

use std::fmt;

/// Service configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host (HOST, default 0.0.0.0).
    pub host: String,
    /// Bind port (PORT, default 8080).
    pub port: u16,
    /// PostgreSQL connection string (DATABASE_URL, required).
    pub database_url: String,
    /// Log filter (RUST_LOG, default "info").
    pub rust_log: String,
}

/// Configuration loading error.
#[derive(Debug)]
pub struct ConfigError(String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError("DATABASE_URL is required".to_string()))?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_port(std::env::var("PORT").ok())?;
        let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            host,
            port,
            database_url,
            rust_log,
        })
    }
}

/// Parse the PORT variable, defaulting to 8080.
fn parse_port(raw: Option<String>) -> Result<u16, ConfigError> {
    match raw {
        None => Ok(8080),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError(format!("PORT '{value}' is not a valid port number"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_defaults_to_8080() {
        assert_eq!(parse_port(None).unwrap(), 8080);
    }

    #[test]
    fn port_parses_valid_values() {
        assert_eq!(parse_port(Some("3000".to_string())).unwrap(), 3000);
    }

    #[test]
    fn port_rejects_garbage() {
        assert!(parse_port(Some("not-a-port".to_string())).is_err());
    }
}
