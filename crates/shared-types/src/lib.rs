//! # Shared Types Crate
//!
//! Types shared by the gateway (server side) and client sessions.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every JSON body that crosses the transport is
//!   defined in [`wire`].
//! - **Opaque Identity**: a queue is addressed only by `(name, access key)`;
//!   neither component carries meaning to the server.
//! - **Timestamp as Handle**: an [`EventId`] is the event's score in its queue
//!   and the only handle used to acknowledge it.

pub mod clock;
pub mod entities;
pub mod errors;
pub mod wire;

pub use clock::MonotonicClock;
pub use entities::*;
pub use errors::*;
pub use wire::*;
