//! Queue Store entities.

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use shared_types::{EventId, QueueKey};

/// Default maximum number of events held by one queue.
pub const DEFAULT_MAX_LENGTH: usize = 10_000;

/// Default idle lifetime of a queue (refreshed on every publish).
pub const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Default server-side wait of a blocking fetch.
pub const DEFAULT_BLOCK_TIMEOUT: Duration = Duration::from_secs(20);

/// Queue Store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    /// Publishes are rejected once a queue holds this many events.
    pub max_length: usize,
    /// Idle lifetime; a queue with no publish for this long vanishes.
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
    /// How long a blocking fetch waits before reporting empty.
    #[serde(with = "humantime_serde")]
    pub block_timeout: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            ttl: DEFAULT_TTL,
            block_timeout: DEFAULT_BLOCK_TIMEOUT,
        }
    }
}

/// One event as held by the store: its score and the opaque envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEvent {
    pub event_id: EventId,
    pub envelope: String,
}

impl StoredEvent {
    pub fn new(event_id: EventId, envelope: impl Into<String>) -> Self {
        Self {
            event_id,
            envelope: envelope.into(),
        }
    }
}

impl From<(u64, String)> for StoredEvent {
    fn from((score, member): (u64, String)) -> Self {
        Self::new(EventId(score), member)
    }
}
