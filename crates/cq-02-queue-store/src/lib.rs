//! # Queue Store Subsystem
//!
//! **Subsystem ID:** 2
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! Server-side storage for sealed events. Each `(queue name, access key)` pair
//! owns one ordered, capacity-bounded, TTL'd collection of envelopes keyed by
//! their nanosecond timestamp. The store never sees plaintext.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Score order: pop-minimum returns the earliest event | `ports/outbound.rs` - `SortedSetStore` contract |
//! | INVARIANT-2 | Size never exceeds `max_length`; full queues reject | `service.rs` - `publish()` via `insert_bounded` |
//! | INVARIANT-3 | Every publish refreshes the queue TTL | `service.rs` - `publish()` |
//! | INVARIANT-4 | At most one acknowledging fetch removes a given event | `adapters/` - atomic pop |
//! | INVARIANT-5 | Acknowledge is idempotent | `service.rs` - `acknowledge()` |
//!
//! ## Fetch Modes
//!
//! | ack | block | Effect |
//! |-----|-------|--------|
//! | true | false | Pop minimum, or `Empty` |
//! | true | true | Pop minimum, waiting up to `block_timeout` |
//! | false | false | Peek minimum, or `Empty` |
//! | false | true | Peek; if empty, blocking pop then re-insert (racy, see below) |
//!
//! The blocking peek re-inserts the popped member at its original score. A
//! concurrent acknowledging fetch can take the event in between; this is a
//! known consistency gap, not a bug to paper over. The restore honours
//! `max_length` unless publishes filled the queue meanwhile, in which case the
//! event still goes back and the queue holds one more than its capacity.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  adapters/memory.rs - In-process sorted sets with native wait   │
//! │  adapters/redis.rs  - Redis ZSET backend (feature = "redis")    │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - QueueApi trait                             │
//! │  ports/outbound.rs - SortedSetStore trait                       │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/entities.rs      - QueueConfig, StoredEvent             │
//! │  domain/value_objects.rs - FetchMode, FetchOutcome, AckOutcome  │
//! │  domain/errors.rs        - QueueError                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use service::QueueStore;
