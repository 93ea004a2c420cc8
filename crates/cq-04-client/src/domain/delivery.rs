//! Fetched events and their acknowledgment handles.

use crate::ports::Transport;
use crate::session::QueueSession;
use crate::ClientError;
use cq_01_envelope::Event;
use shared_types::EventId;

/// A decoded event plus the handle needed to acknowledge it.
///
/// The event is plain data; acknowledgment goes through [`AckHandle`].
pub struct Delivery<T: Transport> {
    pub event: Event,
    pub handle: AckHandle<T>,
}

impl<T: Transport> Delivery<T> {
    pub fn event_id(&self) -> EventId {
        self.handle.event_id
    }

    /// Acknowledge this event on its originating session.
    pub async fn ack(&self) -> Result<bool, ClientError> {
        self.handle.ack().await
    }

    pub fn into_parts(self) -> (Event, AckHandle<T>) {
        (self.event, self.handle)
    }
}

/// Event id bound to the session that fetched it.
pub struct AckHandle<T: Transport> {
    event_id: EventId,
    session: QueueSession<T>,
}

impl<T: Transport> AckHandle<T> {
    pub(crate) fn new(event_id: EventId, session: QueueSession<T>) -> Self {
        Self { event_id, session }
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Acknowledge; `Ok(false)` if the event was already gone.
    pub async fn ack(&self) -> Result<bool, ClientError> {
        self.session.ack(self.event_id).await
    }
}

// Manual impls: the transport type itself need not be Clone or Debug.

impl<T: Transport> Clone for Delivery<T> {
    fn clone(&self) -> Self {
        Self {
            event: self.event.clone(),
            handle: self.handle.clone(),
        }
    }
}

impl<T: Transport> std::fmt::Debug for Delivery<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Delivery")
            .field("event_id", &self.handle.event_id)
            .field("event", &self.event)
            .finish()
    }
}

impl<T: Transport> Clone for AckHandle<T> {
    fn clone(&self) -> Self {
        Self {
            event_id: self.event_id,
            session: self.session.clone(),
        }
    }
}

impl<T: Transport> std::fmt::Debug for AckHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AckHandle")
            .field("event_id", &self.event_id)
            .finish_non_exhaustive()
    }
}
