//! Middleware stack for the gateway.
//!
//! Layer order: Request → Tracing → Timeout → BodyLimit → Handler

pub mod tracing;

pub use self::tracing::TracingLayer;
