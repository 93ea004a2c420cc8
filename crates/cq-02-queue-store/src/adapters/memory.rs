//! # In-Memory Sorted Sets
//!
//! Process-local implementation of [`SortedSetStore`].
//!
//! - `BTreeMap<u64, String>` per key gives score order and last-write-wins on
//!   score collisions.
//! - TTLs are enforced lazily: an expired set is dropped the next time any
//!   operation touches its key, and writes sweep every expired key at most
//!   once per [`SWEEP_INTERVAL`] so that abandoned queues do not pile up.
//! - Blocking pop parks on a per-key [`Notify`] that every insert signals, so
//!   a waiter wakes as soon as data arrives instead of polling.
//!
//! Single-node only: state is lost on restart and invisible to other
//! processes. Use the Redis adapter for shared deployments.

use crate::ports::outbound::{BoundedInsert, SortedSetStore, StoreBackendError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::debug;

/// Minimum spacing between full sweeps of expired keys.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
struct SortedSet {
    members: BTreeMap<u64, String>,
    expires_at: Option<Instant>,
}

impl SortedSet {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-memory sorted-set store.
#[derive(Debug, Default)]
pub struct InMemorySortedSetStore {
    sets: Mutex<HashMap<String, SortedSet>>,
    waiters: Mutex<HashMap<String, Arc<Notify>>>,
    last_sweep: Mutex<Option<Instant>>,
}

impl InMemorySortedSetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys (expired ones are purged first).
    pub fn key_count(&self) -> usize {
        let now = Instant::now();
        let mut sets = self.sets.lock();
        sets.retain(|_, set| !set.is_expired(now));
        sets.len()
    }

    /// Drop every expired set if the last sweep is older than
    /// [`SWEEP_INTERVAL`]. Called with the `sets` lock held.
    fn sweep_expired(&self, sets: &mut HashMap<String, SortedSet>, now: Instant) {
        let mut last = self.last_sweep.lock();
        if last.is_some_and(|at| now.duration_since(at) < SWEEP_INTERVAL) {
            return;
        }
        *last = Some(now);
        let before = sets.len();
        sets.retain(|_, set| !set.is_expired(now));
        let swept = before - sets.len();
        if swept > 0 {
            debug!(swept, remaining = sets.len(), "dropped expired queues");
        }
    }

    /// Run `f` on the live set at `key`, dropping it first if expired and
    /// afterwards if `f` left it empty.
    fn with_set<R>(&self, key: &str, f: impl FnOnce(Option<&mut SortedSet>) -> R) -> R {
        let now = Instant::now();
        let mut sets = self.sets.lock();

        if sets.get(key).is_some_and(|set| set.is_expired(now)) {
            sets.remove(key);
        }

        let result = f(sets.get_mut(key));

        if sets.get(key).is_some_and(|set| set.members.is_empty()) {
            sets.remove(key);
        }
        result
    }

    fn put(&self, key: &str, score: u64, member: &str, ttl: Duration) {
        let now = Instant::now();
        {
            let mut sets = self.sets.lock();
            self.sweep_expired(&mut sets, now);
            if sets.get(key).is_some_and(|set| set.is_expired(now)) {
                sets.remove(key);
            }
            let set = sets.entry(key.to_string()).or_default();
            set.members.insert(score, member.to_string());
            set.expires_at = Some(now + ttl);
        }
        self.wake(key);
    }

    fn take_min(&self, key: &str) -> Option<(u64, String)> {
        self.with_set(key, |set| set.and_then(|set| set.members.pop_first()))
    }

    fn register_waiter<'a>(&'a self, key: &'a str) -> WaiterGuard<'a> {
        let notify = Arc::clone(self.waiters.lock().entry(key.to_string()).or_default());
        WaiterGuard {
            store: self,
            key,
            notify,
        }
    }

    fn wake(&self, key: &str) {
        if let Some(notify) = self.waiters.lock().get(key) {
            notify.notify_waiters();
        }
    }

    fn forget_idle_waiter(&self, key: &str) {
        let mut waiters = self.waiters.lock();
        if waiters
            .get(key)
            .is_some_and(|notify| Arc::strong_count(notify) == 1)
        {
            waiters.remove(key);
        }
    }
}

/// A registered blocking pop. Dropping it, on return or when the pop future
/// is cancelled, releases the key's [`Notify`] once no other waiter holds it.
struct WaiterGuard<'a> {
    store: &'a InMemorySortedSetStore,
    key: &'a str,
    notify: Arc<Notify>,
}

impl Drop for WaiterGuard<'_> {
    fn drop(&mut self) {
        let mut waiters = self.store.waiters.lock();
        // Two references: the map entry and ours.
        if waiters.get(self.key).is_some_and(|notify| {
            Arc::ptr_eq(notify, &self.notify) && Arc::strong_count(notify) == 2
        }) {
            waiters.remove(self.key);
        }
    }
}

#[async_trait]
impl SortedSetStore for InMemorySortedSetStore {
    async fn insert_bounded(
        &self,
        key: &str,
        score: u64,
        member: &str,
        max_len: usize,
        ttl: Duration,
    ) -> Result<BoundedInsert, StoreBackendError> {
        let now = Instant::now();
        let outcome = {
            let mut sets = self.sets.lock();
            self.sweep_expired(&mut sets, now);
            if sets.get(key).is_some_and(|set| set.is_expired(now)) {
                sets.remove(key);
            }
            let len = sets.get(key).map_or(0, |set| set.members.len());
            if len >= max_len {
                BoundedInsert::Full { len }
            } else {
                let set = sets.entry(key.to_string()).or_default();
                set.members.insert(score, member.to_string());
                set.expires_at = Some(now + ttl);
                BoundedInsert::Inserted { len }
            }
        };

        if matches!(outcome, BoundedInsert::Inserted { .. }) {
            self.wake(key);
        }
        Ok(outcome)
    }

    async fn insert(
        &self,
        key: &str,
        score: u64,
        member: &str,
        ttl: Duration,
    ) -> Result<(), StoreBackendError> {
        self.put(key, score, member, ttl);
        Ok(())
    }

    async fn pop_min(&self, key: &str) -> Result<Option<(u64, String)>, StoreBackendError> {
        Ok(self.take_min(key))
    }

    async fn blocking_pop_min(
        &self,
        key: &str,
        timeout: Duration,
    ) -> Result<Option<(u64, String)>, StoreBackendError> {
        let deadline = Instant::now() + timeout;
        let waiter = self.register_waiter(key);

        let popped = loop {
            // Register interest before checking so an insert between the
            // check and the wait is not missed.
            let notified = waiter.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(hit) = self.take_min(key) {
                break Some(hit);
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                break None;
            }
        };

        Ok(popped)
    }

    async fn peek_min(&self, key: &str) -> Result<Option<(u64, String)>, StoreBackendError> {
        Ok(self.with_set(key, |set| {
            set.and_then(|set| {
                set.members
                    .first_key_value()
                    .map(|(score, member)| (*score, member.clone()))
            })
        }))
    }

    async fn remove_by_score(&self, key: &str, score: u64) -> Result<usize, StoreBackendError> {
        Ok(self.with_set(key, |set| {
            set.and_then(|set| set.members.remove(&score)).map_or(0, |_| 1)
        }))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreBackendError> {
        self.sets.lock().remove(key);
        self.forget_idle_waiter(key);
        Ok(())
    }

    async fn cardinality(&self, key: &str) -> Result<usize, StoreBackendError> {
        Ok(self.with_set(key, |set| set.map_or(0, |set| set.members.len())))
    }
}
