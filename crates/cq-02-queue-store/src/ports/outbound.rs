//! # Outbound Ports (Driven Ports)
//!
//! The sorted-set primitive the Queue Store needs from its backing store.
//!
//! Production: `RedisSortedSetStore` (feature `redis`)
//! Testing / single node: `InMemorySortedSetStore`

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Backing store failures.
#[derive(Debug, Clone, Error)]
pub enum StoreBackendError {
    /// Store unreachable or connection dropped.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Store answered with something unexpected.
    #[error("unexpected store reply: {0}")]
    Protocol(String),
}

/// Result of [`SortedSetStore::insert_bounded`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundedInsert {
    /// Member stored; `len` is the cardinality before the insert.
    Inserted { len: usize },
    /// Set already at `max_len`; nothing written.
    Full { len: usize },
}

/// Ordered members with `u64` scores, one set per string key.
///
/// ## Contract
///
/// - Members are ordered by score; at most one member per score (a second
///   insert at the same score replaces the first).
/// - An emptied set ceases to exist, and with it its TTL.
/// - Pop operations are atomic: one member is handed to exactly one caller.
#[async_trait]
pub trait SortedSetStore: Send + Sync {
    /// Atomically: reject if `cardinality >= max_len`, else insert
    /// `(score, member)` and set the key's TTL to `ttl`.
    async fn insert_bounded(
        &self,
        key: &str,
        score: u64,
        member: &str,
        max_len: usize,
        ttl: Duration,
    ) -> Result<BoundedInsert, StoreBackendError>;

    /// Unconditional insert that also sets the key's TTL.
    async fn insert(
        &self,
        key: &str,
        score: u64,
        member: &str,
        ttl: Duration,
    ) -> Result<(), StoreBackendError>;

    /// Remove and return the minimum-score member.
    async fn pop_min(&self, key: &str) -> Result<Option<(u64, String)>, StoreBackendError>;

    /// Like [`pop_min`](Self::pop_min) but waits up to `timeout` for a member
    /// to appear.
    async fn blocking_pop_min(
        &self,
        key: &str,
        timeout: Duration,
    ) -> Result<Option<(u64, String)>, StoreBackendError>;

    /// Return the minimum-score member without removing it.
    async fn peek_min(&self, key: &str) -> Result<Option<(u64, String)>, StoreBackendError>;

    /// Remove members whose score equals `score`; returns how many.
    async fn remove_by_score(&self, key: &str, score: u64) -> Result<usize, StoreBackendError>;

    /// Drop the whole set.
    async fn delete(&self, key: &str) -> Result<(), StoreBackendError>;

    /// Number of members.
    async fn cardinality(&self, key: &str) -> Result<usize, StoreBackendError>;
}
