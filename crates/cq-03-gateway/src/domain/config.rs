//! Gateway configuration with validation.

use cq_02_queue_store::QueueConfig;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Main gateway configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Queue capacity, TTL and blocking-fetch window
    pub queue: QueueConfig,
    /// Request limits
    pub limits: LimitsConfig,
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue.max_length == 0 {
            return Err(ConfigError::InvalidLimit("max_length cannot be 0".into()));
        }

        if self.limits.max_body_bytes == 0 {
            return Err(ConfigError::InvalidLimit("max_body_bytes cannot be 0".into()));
        }

        if self.queue.ttl.is_zero() {
            return Err(ConfigError::InvalidTimeout("ttl cannot be 0".into()));
        }

        if self.queue.block_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "block_timeout cannot be 0".into(),
            ));
        }

        // A blocking fetch must be able to finish before the request is cut off.
        if self.limits.request_timeout <= self.queue.block_timeout {
            return Err(ConfigError::InvalidTimeout(format!(
                "request_timeout ({:?}) must exceed block_timeout ({:?})",
                self.limits.request_timeout, self.queue.block_timeout
            )));
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 8080)
    pub port: u16,
    /// How long in-flight requests may run after shutdown is requested
    #[serde(with = "humantime_serde")]
    pub shutdown_grace: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 8080,
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

/// Request limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest accepted request body (default: 1 MiB)
    pub max_body_bytes: usize,
    /// Hard cap on any single request
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024,
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
