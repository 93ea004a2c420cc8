//! Value objects exchanged through the Queue Store ports.

use super::entities::{EventId, StoredEvent};

/// How a fetch treats the event it finds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchMode {
    /// Remove the event on read.
    pub ack: bool,
    /// Wait up to the configured block timeout when the queue is empty.
    pub block: bool,
}

impl FetchMode {
    pub fn new(ack: bool, block: bool) -> Self {
        Self { ack, block }
    }
}

impl Default for FetchMode {
    fn default() -> Self {
        Self {
            ack: true,
            block: false,
        }
    }
}

/// Result of a fetch. `Empty` is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Event(StoredEvent),
    Empty,
}

impl FetchOutcome {
    pub fn into_event(self) -> Option<StoredEvent> {
        match self {
            FetchOutcome::Event(event) => Some(event),
            FetchOutcome::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FetchOutcome::Empty)
    }
}

impl From<Option<StoredEvent>> for FetchOutcome {
    fn from(value: Option<StoredEvent>) -> Self {
        value.map_or(FetchOutcome::Empty, FetchOutcome::Event)
    }
}

/// Result of an acknowledge. Both variants are success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
    Removed(EventId),
    NotFound(EventId),
}

impl AckOutcome {
    pub fn removed(&self) -> bool {
        matches!(self, AckOutcome::Removed(_))
    }
}
