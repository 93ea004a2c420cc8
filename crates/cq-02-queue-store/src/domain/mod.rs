//! # Domain Layer - Queue Store Subsystem
//!
//! ## Components
//!
//! - `entities`: QueueConfig, StoredEvent
//! - `value_objects`: FetchMode, FetchOutcome, AckOutcome
//! - `errors`: QueueError enumeration

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use value_objects::*;
