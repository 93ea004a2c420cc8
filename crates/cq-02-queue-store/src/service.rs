//! # Queue Store Service
//!
//! Implements [`QueueApi`] on top of any [`SortedSetStore`].

use crate::domain::{
    AckOutcome, EventId, FetchMode, FetchOutcome, QueueConfig, QueueError, QueueKey, StoredEvent,
};
use crate::ports::inbound::QueueApi;
use crate::ports::outbound::{BoundedInsert, SortedSetStore};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Queue Store service.
///
/// Holds no per-queue state of its own: everything lives in the backing
/// store under [`QueueKey::storage_key`].
pub struct QueueStore<S: SortedSetStore> {
    store: S,
    config: QueueConfig,
}

impl<S: SortedSetStore> QueueStore<S> {
    pub fn new(store: S, config: QueueConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    async fn peek_or_wait(&self, key: &str) -> Result<Option<(u64, String)>, QueueError> {
        if let Some(head) = self.store.peek_min(key).await? {
            return Ok(Some(head));
        }

        // Nothing to peek at: wait for a publish, then put the event back.
        let Some((score, member)) = self
            .store
            .blocking_pop_min(key, self.config.block_timeout)
            .await?
        else {
            return Ok(None);
        };
        let restored = self
            .store
            .insert_bounded(key, score, &member, self.config.max_length, self.config.ttl)
            .await?;
        if let BoundedInsert::Full { len } = restored {
            // Publishes filled the queue while the event was out. A peek must
            // not lose it, so it goes back one over capacity.
            warn!(
                depth = len,
                capacity = self.config.max_length,
                "queue filled during blocking peek, restoring over capacity"
            );
            self.store
                .insert(key, score, &member, self.config.ttl)
                .await?;
        }
        Ok(Some((score, member)))
    }
}

#[async_trait]
impl<S: SortedSetStore> QueueApi for QueueStore<S> {
    async fn publish(
        &self,
        queue: &QueueKey,
        envelope: String,
        event_id: EventId,
    ) -> Result<EventId, QueueError> {
        let key = queue.storage_key();

        // INVARIANT-2 / INVARIANT-3: capacity check, insert and TTL refresh
        // happen in one backend step.
        let outcome = self
            .store
            .insert_bounded(
                &key,
                event_id.as_u64(),
                &envelope,
                self.config.max_length,
                self.config.ttl,
            )
            .await?;

        match outcome {
            BoundedInsert::Inserted { len } => {
                debug!(queue = queue.name(), %event_id, depth = len + 1, "event published");
                Ok(event_id)
            }
            BoundedInsert::Full { len } => {
                warn!(queue = queue.name(), depth = len, "queue full, publish rejected");
                Err(QueueError::QueueFull {
                    capacity: self.config.max_length,
                })
            }
        }
    }

    async fn fetch(&self, queue: &QueueKey, mode: FetchMode) -> Result<FetchOutcome, QueueError> {
        let key = queue.storage_key();

        let head = match (mode.ack, mode.block) {
            (true, false) => self.store.pop_min(&key).await?,
            (true, true) => {
                self.store
                    .blocking_pop_min(&key, self.config.block_timeout)
                    .await?
            }
            (false, false) => self.store.peek_min(&key).await?,
            (false, true) => self.peek_or_wait(&key).await?,
        };

        let outcome = FetchOutcome::from(head.map(StoredEvent::from));
        if let FetchOutcome::Event(event) = &outcome {
            debug!(
                queue = queue.name(),
                event_id = %event.event_id,
                ack = mode.ack,
                "event fetched"
            );
        }
        Ok(outcome)
    }

    async fn acknowledge(
        &self,
        queue: &QueueKey,
        event_id: EventId,
    ) -> Result<AckOutcome, QueueError> {
        let removed = self
            .store
            .remove_by_score(&queue.storage_key(), event_id.as_u64())
            .await?;

        // INVARIANT-5: a missing event is not an error.
        if removed > 0 {
            debug!(queue = queue.name(), %event_id, "event acknowledged");
            Ok(AckOutcome::Removed(event_id))
        } else {
            debug!(queue = queue.name(), %event_id, "acknowledge of absent event");
            Ok(AckOutcome::NotFound(event_id))
        }
    }

    async fn clear(&self, queue: &QueueKey) -> Result<(), QueueError> {
        self.store.delete(&queue.storage_key()).await?;
        info!(queue = queue.name(), "queue cleared");
        Ok(())
    }

    async fn len(&self, queue: &QueueKey) -> Result<usize, QueueError> {
        Ok(self.store.cardinality(&queue.storage_key()).await?)
    }
}
