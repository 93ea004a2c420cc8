//! # Inbound Port - QueueApi
//!
//! Primary driving port used by the transport handlers.

use crate::domain::{AckOutcome, EventId, FetchMode, FetchOutcome, QueueError, QueueKey};
use async_trait::async_trait;

/// Primary API of the Queue Store subsystem.
///
/// Every call is scoped to one queue. Queues are created implicitly by the
/// first publish and vanish on clear or TTL expiry.
///
/// # Example
///
/// ```rust,ignore
/// use cq_02_queue_store::{FetchMode, InMemorySortedSetStore, QueueApi, QueueConfig, QueueStore};
///
/// let store = QueueStore::new(InMemorySortedSetStore::new(), QueueConfig::default());
/// let queue = QueueKey::new("orders", "k1")?;
/// store.publish(&queue, envelope, clock.next_id()).await?;
/// if let FetchOutcome::Event(event) = store.fetch(&queue, FetchMode::new(false, false)).await? {
///     store.acknowledge(&queue, event.event_id).await?;
/// }
/// ```
#[async_trait]
pub trait QueueApi: Send + Sync {
    /// Inserts `envelope` under `event_id` and refreshes the queue TTL.
    ///
    /// # Errors
    /// - `QueueFull`: the queue already holds `max_length` events
    /// - `Backend`: the sorted-set store failed
    async fn publish(
        &self,
        queue: &QueueKey,
        envelope: String,
        event_id: EventId,
    ) -> Result<EventId, QueueError>;

    /// Returns the earliest event, removing it when `mode.ack` is set.
    async fn fetch(&self, queue: &QueueKey, mode: FetchMode) -> Result<FetchOutcome, QueueError>;

    /// Removes the event with score `event_id`. Idempotent.
    async fn acknowledge(&self, queue: &QueueKey, event_id: EventId)
        -> Result<AckOutcome, QueueError>;

    /// Deletes the whole queue.
    async fn clear(&self, queue: &QueueKey) -> Result<(), QueueError>;

    /// Number of events currently held.
    async fn len(&self, queue: &QueueKey) -> Result<usize, QueueError>;
}
