// ABOUTME: Configuration loading for the conclave server.
// ABOUTME: Reads the bind address from the environment with a loopback default.

use std::net::SocketAddr;

use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("CONCLAVE_BIND is not a valid socket address: {0}")]
    InvalidBind(String),
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// - CONCLAVE_BIND: socket address to bind (default: 127.0.0.1:8765)
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_str =
            std::env::var("CONCLAVE_BIND").unwrap_or_else(|_| "127.0.0.1:8765".to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_str))?;

        Ok(Self { bind })
    }
}
