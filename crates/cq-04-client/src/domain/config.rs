//! Client configuration from environment variables or a builder.

use super::errors::ClientError;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::warn;

/// Default server when nothing is configured.
pub const DEFAULT_SERVER_ADDR: &str = "http://127.0.0.1:8080";

/// Server-side blocking-fetch window assumed when none is configured.
pub const DEFAULT_SERVER_BLOCK_WINDOW: Duration = Duration::from_secs(20);

/// How a blocking `get` spaces its fetch attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollPolicy {
    /// Minimum spacing between the starts of two attempts.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    /// Attempts before a blocking `get` gives up and returns nothing.
    pub max_polls: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_polls: 3,
        }
    }
}

/// Client Session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URLs; one is picked at random per call.
    pub server_addrs: Vec<String>,
    pub poll: PollPolicy,
    /// Per-request cap. Must exceed `server_block_window`, or a blocking
    /// acknowledging fetch could pop an event after the client gave up.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// How long the servers hold a blocking fetch open.
    #[serde(with = "humantime_serde")]
    pub server_block_window: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addrs: vec![DEFAULT_SERVER_ADDR.to_string()],
            poll: PollPolicy::default(),
            request_timeout: Duration::from_secs(30),
            server_block_window: DEFAULT_SERVER_BLOCK_WINDOW,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CQ_SERVER_ADDRS`: comma-separated base URLs (default: http://127.0.0.1:8080)
    /// - `CQ_POLL_INTERVAL_MS`: spacing of blocking polls (default: 2000)
    /// - `CQ_MAX_POLLS`: attempts per blocking get (default: 3)
    /// - `CQ_REQUEST_TIMEOUT_SECS`: per-request timeout (default: 30)
    /// - `CQ_BLOCK_TIMEOUT_SECS`: the servers' blocking window (default: 20)
    ///
    /// Unparseable values are logged and the default is kept.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let mut config = Self::default();

        if let Some(addrs) = lookup("CQ_SERVER_ADDRS") {
            config.server_addrs = split_addrs(&addrs);
        }
        if let Some(ms) = parsed::<u64>(&lookup, "CQ_POLL_INTERVAL_MS") {
            config.poll.interval = Duration::from_millis(ms);
        }
        if let Some(polls) = parsed::<u32>(&lookup, "CQ_MAX_POLLS") {
            config.poll.max_polls = polls;
        }
        if let Some(secs) = parsed::<u64>(&lookup, "CQ_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parsed::<u64>(&lookup, "CQ_BLOCK_TIMEOUT_SECS") {
            config.server_block_window = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.server_addrs.is_empty() {
            return Err(ClientError::Config("no server addresses configured".into()));
        }
        if self.poll.max_polls == 0 {
            return Err(ClientError::Config("max_polls cannot be 0".into()));
        }
        if self.request_timeout.is_zero() {
            return Err(ClientError::Config("request_timeout cannot be 0".into()));
        }
        if self.request_timeout <= self.server_block_window {
            return Err(ClientError::Config(format!(
                "request_timeout ({:?}) must exceed server_block_window ({:?})",
                self.request_timeout, self.server_block_window
            )));
        }
        Ok(())
    }
}

fn split_addrs(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .map(|addr| addr.trim_end_matches('/').to_string())
        .collect()
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

/// Builder for [`ClientConfig`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfigBuilder {
    server_addrs: Vec<String>,
    poll: PollPolicy,
    request_timeout: Option<Duration>,
    server_block_window: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Add one server base URL.
    pub fn server(mut self, addr: impl Into<String>) -> Self {
        let addr = addr.into();
        self.server_addrs
            .push(addr.trim_end_matches('/').to_string());
        self
    }

    /// Add several server base URLs.
    pub fn servers<I, S>(mut self, addrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for addr in addrs {
            self = self.server(addr);
        }
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll.interval = interval;
        self
    }

    pub fn max_polls(mut self, max_polls: u32) -> Self {
        self.poll.max_polls = max_polls;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn server_block_window(mut self, window: Duration) -> Self {
        self.server_block_window = Some(window);
        self
    }

    pub fn build(self) -> Result<ClientConfig, ClientError> {
        let defaults = ClientConfig::default();
        let config = ClientConfig {
            server_addrs: self.server_addrs,
            poll: self.poll,
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            server_block_window: self
                .server_block_window
                .unwrap_or(defaults.server_block_window),
        };
        config.validate()?;
        Ok(config)
    }
}
