//! Ports (hexagonal boundaries) of the Queue Store.

pub mod inbound;
pub mod outbound;

pub use inbound::QueueApi;
pub use outbound::{BoundedInsert, SortedSetStore, StoreBackendError};
