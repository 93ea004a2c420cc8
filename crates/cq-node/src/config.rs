//! # Node Configuration
//!
//! Gateway settings plus backend choice, read from the environment.
//!
//! Unparseable values are logged and the default kept; a node should come up
//! with a typo in an optional knob rather than refuse to start. Only an
//! unusable backend choice is fatal.

use cq_03_gateway::GatewayConfig;
use std::env;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Where queues are kept.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackendConfig {
    /// In-process sorted sets. Lost on restart.
    #[default]
    Memory,
    /// Redis sorted sets at `url`.
    Redis { url: String },
}

impl BackendConfig {
    pub fn name(&self) -> &'static str {
        match self {
            BackendConfig::Memory => "memory",
            BackendConfig::Redis { .. } => "redis",
        }
    }
}

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// HTTP, queue and limit settings.
    pub gateway: GatewayConfig,
    /// Store backend.
    pub backend: BackendConfig,
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NodeConfigError {
    #[error("unknown backend {0:?} (expected \"memory\" or \"redis\")")]
    UnknownBackend(String),

    #[error("backend \"redis\" requires CQ_REDIS_URL")]
    MissingRedisUrl,
}

impl NodeConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CQ_HTTP_HOST`: bind address (default: 0.0.0.0)
    /// - `CQ_HTTP_PORT`: port (default: 8080)
    /// - `CQ_SHUTDOWN_GRACE_SECS`: drain window on shutdown (default: 5)
    /// - `CQ_MAX_LENGTH`: per-queue capacity (default: 10000)
    /// - `CQ_TTL_SECS`: idle queue lifetime (default: 604800)
    /// - `CQ_BLOCK_TIMEOUT_SECS`: blocking fetch window (default: 20)
    /// - `CQ_MAX_BODY_BYTES`: request body limit (default: 1048576)
    /// - `CQ_REQUEST_TIMEOUT_SECS`: per-request cap (default: 60)
    /// - `CQ_BACKEND`: `memory` or `redis` (default: memory)
    /// - `CQ_REDIS_URL`: e.g. `redis://127.0.0.1:6379/0`
    pub fn from_env() -> Result<Self, NodeConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, NodeConfigError> {
        let mut config = Self::default();
        let gw = &mut config.gateway;

        if let Some(host) = parsed::<IpAddr>(&lookup, "CQ_HTTP_HOST") {
            gw.http.host = host;
        }
        if let Some(port) = parsed::<u16>(&lookup, "CQ_HTTP_PORT") {
            gw.http.port = port;
        }
        if let Some(secs) = parsed::<u64>(&lookup, "CQ_SHUTDOWN_GRACE_SECS") {
            gw.http.shutdown_grace = Duration::from_secs(secs);
        }
        if let Some(len) = parsed::<usize>(&lookup, "CQ_MAX_LENGTH") {
            gw.queue.max_length = len;
        }
        if let Some(secs) = parsed::<u64>(&lookup, "CQ_TTL_SECS") {
            gw.queue.ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = parsed::<u64>(&lookup, "CQ_BLOCK_TIMEOUT_SECS") {
            gw.queue.block_timeout = Duration::from_secs(secs);
        }
        if let Some(bytes) = parsed::<usize>(&lookup, "CQ_MAX_BODY_BYTES") {
            gw.limits.max_body_bytes = bytes;
        }
        if let Some(secs) = parsed::<u64>(&lookup, "CQ_REQUEST_TIMEOUT_SECS") {
            gw.limits.request_timeout = Duration::from_secs(secs);
        }

        config.backend = match lookup("CQ_BACKEND").as_deref().map(str::trim) {
            None | Some("") | Some("memory") => BackendConfig::Memory,
            Some("redis") => match lookup("CQ_REDIS_URL") {
                Some(url) if !url.trim().is_empty() => BackendConfig::Redis {
                    url: url.trim().to_string(),
                },
                _ => return Err(NodeConfigError::MissingRedisUrl),
            },
            Some(other) => return Err(NodeConfigError::UnknownBackend(other.to_string())),
        };

        Ok(config)
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, value = %raw, "ignoring unparseable environment variable");
            None
        }
    }
}
