//! # Outbound Port - Transport
//!
//! The four queue operations (plus stats) against one server address. Every
//! reply is folded into a closed [`TransportOutcome`] so the session never
//! inspects raw status codes.
//!
//! Production: `HttpTransport`
//! Testing: in-process mocks

use async_trait::async_trait;
use shared_types::{
    AckResponse, ClearResponse, EventId, FetchResponse, PublishRequest, PublishResponse,
    QueueKey, StatsResponse,
};
use thiserror::Error;

/// Result of one transport call.
#[derive(Debug)]
pub enum TransportOutcome<T> {
    /// Success with a body.
    Ok(T),
    /// No event available (fetch only).
    Empty,
    /// Publish refused: queue at capacity.
    CapacityExceeded,
    /// Anything else.
    Error(TransportError),
}

impl<T> TransportOutcome<T> {
    /// Collapse into a `Result`, reporting `Empty` as `None`.
    pub fn into_result(self) -> Result<Option<T>, TransportError> {
        match self {
            TransportOutcome::Ok(value) => Ok(Some(value)),
            TransportOutcome::Empty => Ok(None),
            TransportOutcome::CapacityExceeded => Err(TransportError::UnexpectedCapacity),
            TransportOutcome::Error(e) => Err(e),
        }
    }
}

/// Transport failure detail.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Could not reach the server or the request timed out.
    #[error("connection to {addr} failed: {reason}")]
    Connection { addr: String, reason: String },

    /// Server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Success status but the body did not parse.
    #[error("malformed response: {0}")]
    Decode(String),

    /// Request could not be built (bad base URL).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Capacity reported where it makes no sense.
    #[error("unexpected capacity response")]
    UnexpectedCapacity,

    /// Empty reported where a body was required.
    #[error("unexpected empty response")]
    UnexpectedEmpty,
}

/// Queue operations against a server at `addr`.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn fetch(
        &self,
        addr: &str,
        queue: &QueueKey,
        ack: bool,
        block: bool,
    ) -> TransportOutcome<FetchResponse>;

    async fn publish(
        &self,
        addr: &str,
        queue: &QueueKey,
        request: &PublishRequest,
    ) -> TransportOutcome<PublishResponse>;

    async fn acknowledge(
        &self,
        addr: &str,
        queue: &QueueKey,
        event_id: EventId,
    ) -> TransportOutcome<AckResponse>;

    async fn clear(&self, addr: &str, queue: &QueueKey) -> TransportOutcome<ClearResponse>;

    async fn stats(&self, addr: &str, queue: &QueueKey) -> TransportOutcome<StatsResponse>;
}
