//! Strictly increasing nanosecond clock used to mint event ids.

use crate::entities::EventId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock nanoseconds that never repeat or go backwards for one instance.
///
/// If two reads land on the same nanosecond (or the system clock steps back)
/// the next value is `last + 1`.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: AtomicU64,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next event id.
    pub fn next_id(&self) -> EventId {
        let now = wall_clock_nanos();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last.saturating_add(1));
            match self.last.compare_exchange_weak(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return EventId(candidate),
                Err(observed) => last = observed,
            }
        }
    }
}

fn wall_clock_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
