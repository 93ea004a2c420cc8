//! # Queue Session
//!
//! One `(queue name, access key, secret)` bound to a pool of servers.
//!
//! ## Blocking `get`
//!
//! ```text
//! POLL ──event──────────────────────────▶ DONE(Some)
//!  │ ──empty/error, budget left──▶ POLL
//!  └──empty/error, budget spent─▶ DONE(None)
//! ```
//!
//! Each poll is one server-side blocking fetch. Attempts are spaced at least
//! `poll.interval` apart so a server with a short (or no) blocking window is
//! not hammered. Nothing carries over between calls.

use crate::adapters::HttpTransport;
use crate::domain::{AckHandle, AddressPool, ClientConfig, ClientError, Delivery, PollPolicy};
use crate::ports::{Transport, TransportError, TransportOutcome};
use cq_01_envelope::{EnvelopeCodec, EnvelopeError};
use serde::Serialize;
use shared_types::{EventId, MonotonicClock, PublishRequest, QueueKey};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, warn};

struct SessionInner<T> {
    queue: QueueKey,
    codec: EnvelopeCodec,
    pool: AddressPool,
    poll: PollPolicy,
    clock: MonotonicClock,
    transport: T,
}

/// Producer/consumer handle for one queue.
///
/// Cheap to clone; clones share the derived key, clock and transport.
pub struct QueueSession<T: Transport = HttpTransport> {
    inner: Arc<SessionInner<T>>,
}

impl<T: Transport> Clone for QueueSession<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> std::fmt::Debug for QueueSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueSession")
            .field("queue", &self.inner.queue)
            .field("servers", &self.inner.pool.len())
            .finish_non_exhaustive()
    }
}

impl QueueSession<HttpTransport> {
    /// Open a session over HTTP.
    ///
    /// Runs the key derivation once; expect this to take tens of milliseconds.
    pub fn connect(
        name: impl Into<String>,
        access_key: impl Into<String>,
        secret: impl AsRef<[u8]>,
        config: ClientConfig,
    ) -> Result<Self, ClientError> {
        let queue = QueueKey::new(name, access_key)?;
        let codec = EnvelopeCodec::from_secret(secret).map_err(ClientError::Validation)?;
        let transport = HttpTransport::new(config.request_timeout)?;
        Self::with_transport(queue, codec, config, transport)
    }
}

impl<T: Transport> QueueSession<T> {
    /// Assemble a session from parts.
    pub fn with_transport(
        queue: QueueKey,
        codec: EnvelopeCodec,
        config: ClientConfig,
        transport: T,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        let pool = AddressPool::new(config.server_addrs)?;
        Ok(Self {
            inner: Arc::new(SessionInner {
                queue,
                codec,
                pool,
                poll: config.poll,
                clock: MonotonicClock::new(),
                transport,
            }),
        })
    }

    pub fn queue(&self) -> &QueueKey {
        &self.inner.queue
    }

    pub fn poll_policy(&self) -> PollPolicy {
        self.inner.poll
    }

    /// Seal and publish `event`; returns the id the server stored it under.
    ///
    /// # Errors
    /// - `Validation`: `event` is not a JSON object (no request is sent)
    /// - `CapacityExceeded`: queue full, back off
    /// - `Transport`: one attempt against one server failed; not retried
    pub async fn put<E: Serialize + ?Sized>(&self, event: &E) -> Result<EventId, ClientError> {
        let event = EnvelopeCodec::validate(event).map_err(ClientError::Validation)?;
        let data = self
            .inner
            .codec
            .seal_event(&event)
            .map_err(ClientError::Validation)?;

        let request = PublishRequest {
            data,
            event_id: Some(self.inner.clock.next_id()),
        };
        let addr = self.inner.pool.pick();

        match self
            .inner
            .transport
            .publish(addr, &self.inner.queue, &request)
            .await
        {
            TransportOutcome::Ok(response) => {
                debug!(queue = self.inner.queue.name(), event_id = %response.event_id, "event published");
                Ok(response.event_id)
            }
            TransportOutcome::CapacityExceeded => {
                warn!(queue = self.inner.queue.name(), "queue full, publish rejected");
                Err(ClientError::CapacityExceeded)
            }
            TransportOutcome::Empty => Err(TransportError::UnexpectedEmpty.into()),
            TransportOutcome::Error(e) => Err(e.into()),
        }
    }

    /// Fetch the earliest event.
    ///
    /// With `ack` the server removes the event on read; otherwise it stays
    /// visible and must be acknowledged through the returned handle.
    /// Transport failures count as "no event". A record that fails to open is
    /// `Corrupt`; with `ack` it is already gone from the server.
    pub async fn get(&self, ack: bool, block: bool) -> Result<Option<Delivery<T>>, ClientError> {
        let attempts = if block { self.inner.poll.max_polls.max(1) } else { 1 };

        for attempt in 1..=attempts {
            let started = Instant::now();
            let addr = self.inner.pool.pick();

            match self
                .inner
                .transport
                .fetch(addr, &self.inner.queue, ack, block)
                .await
            {
                TransportOutcome::Ok(response) => {
                    let event_id = response.event_id;
                    let event = self
                        .inner
                        .codec
                        .open(&response.envelope.data)
                        .map_err(|e| match e {
                            EnvelopeError::Corrupt => ClientError::Corrupt { event_id },
                            other => ClientError::Validation(other),
                        })?;
                    debug!(queue = self.inner.queue.name(), %event_id, attempt, "event received");
                    return Ok(Some(Delivery {
                        event,
                        handle: AckHandle::new(event_id, self.clone()),
                    }));
                }
                TransportOutcome::Empty => {
                    debug!(queue = self.inner.queue.name(), attempt, "queue empty");
                }
                TransportOutcome::CapacityExceeded => {
                    warn!(queue = self.inner.queue.name(), "unexpected capacity reply to fetch");
                }
                TransportOutcome::Error(e) => {
                    warn!(queue = self.inner.queue.name(), error = %e, "fetch failed, treating as empty");
                }
            }

            if attempt < attempts {
                let spent = started.elapsed();
                tokio::time::sleep(self.inner.poll.interval.saturating_sub(spent)).await;
            }
        }

        Ok(None)
    }

    /// Acknowledge `event_id`. Idempotent; `Ok(false)` if it was already gone.
    pub async fn ack(&self, event_id: EventId) -> Result<bool, ClientError> {
        let addr = self.inner.pool.pick();
        let response = self
            .inner
            .transport
            .acknowledge(addr, &self.inner.queue, event_id)
            .await
            .into_result()?
            .ok_or(TransportError::UnexpectedEmpty)?;
        Ok(response.removed)
    }

    /// Delete every event in the queue.
    pub async fn clear(&self) -> Result<bool, ClientError> {
        let addr = self.inner.pool.pick();
        let response = self
            .inner
            .transport
            .clear(addr, &self.inner.queue)
            .await
            .into_result()?
            .ok_or(TransportError::UnexpectedEmpty)?;
        Ok(response.cleared)
    }

    /// Number of events currently queued.
    pub async fn len(&self) -> Result<u64, ClientError> {
        let addr = self.inner.pool.pick();
        let response = self
            .inner
            .transport
            .stats(addr, &self.inner.queue)
            .await
            .into_result()?
            .ok_or(TransportError::UnexpectedEmpty)?;
        Ok(response.length)
    }
}
