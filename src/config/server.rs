//! HTTP server configuration.
//!
//! The API listens on `API_BIND_ADDR`, falling back to the port the catalog
//! dashboard expects when the variable is not set.

use crate::errors::{Error, Result};
use std::net::SocketAddr;

/// Address used when `API_BIND_ADDR` is not set.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:2281";

/// Settings for the API server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address the listener binds to
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    /// Reads the server settings from the environment.
    ///
    /// # Errors
    /// Returns `Error::Config` if `API_BIND_ADDR` is not a valid socket address.
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var("API_BIND_ADDR").ok();
        Self::from_value(raw.as_deref())
    }

    fn from_value(raw: Option<&str>) -> Result<Self> {
        let raw = raw.unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = raw.trim().parse().map_err(|e| Error::Config {
            message: format!("Invalid API_BIND_ADDR '{raw}': {e}"),
        })?;
        Ok(Self { bind_addr })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_default_bind_addr() {
        let config = ServerConfig::from_value(None).unwrap();
        assert_eq!(config.bind_addr.port(), 2281);
        assert!(config.bind_addr.ip().is_loopback());
    }

    #[test]
    fn test_custom_bind_addr() {
        let config = ServerConfig::from_value(Some(" 0.0.0.0:8080 ")).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn test_invalid_bind_addr() {
        let result = ServerConfig::from_value(Some("not-an-address"));
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }
}
