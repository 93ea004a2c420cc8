//! Ports (hexagonal boundaries) of the Client Session.

pub mod transport;

pub use transport::{Transport, TransportError, TransportOutcome};
