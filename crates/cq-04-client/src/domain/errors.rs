//! Client Session error types.

use crate::ports::TransportError;
use cq_01_envelope::EnvelopeError;
use shared_types::{EventId, QueueKeyError};
use thiserror::Error;

/// Errors surfaced by [`QueueSession`](crate::QueueSession).
///
/// | Class | Variant | Retry? |
/// |-------|---------|--------|
/// | Validation | `Validation` | never, fix the input |
/// | Transport | `Transport` | caller's choice |
/// | Capacity | `CapacityExceeded` | back off first |
/// | Crypto | `Corrupt` | never, the stored record is bad |
#[derive(Debug, Error)]
pub enum ClientError {
    /// Event rejected before any network call.
    #[error("invalid event: {0}")]
    Validation(#[source] EnvelopeError),

    /// Queue name or access key rejected.
    #[error("invalid queue identity: {0}")]
    InvalidQueue(#[from] QueueKeyError),

    /// Connection failure or unexpected status.
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    /// Server refused the publish because the queue is full.
    #[error("queue is full")]
    CapacityExceeded,

    /// Fetched envelope failed authentication or decoding.
    #[error("event {event_id} is corrupt or was sealed with another secret")]
    Corrupt { event_id: EventId },

    /// Configuration problem.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// True for errors a producer should answer by slowing down.
    pub fn is_capacity(&self) -> bool {
        matches!(self, Self::CapacityExceeded)
    }
}
