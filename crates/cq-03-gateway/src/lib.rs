//! CQ-03 Gateway - HTTP transport for the Queue Store.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    GATEWAY (cq-03)                        │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │              Middleware Stack                       │  │
//! │  │      Tracing → Timeout → BodyLimit                  │  │
//! │  └─────────────────────┬──────────────────────────────┘  │
//! │                        │                                  │
//! │  ┌─────────────────────┴──────────────────────────────┐  │
//! │  │   Routes: fetch / publish / ack / clear / stats     │  │
//! │  └─────────────────────┬──────────────────────────────┘  │
//! └────────────────────────┼─────────────────────────────────┘
//!                          │  QueueApi
//!                          ▼
//!                  cq-02-queue-store
//! ```
//!
//! The gateway keeps no queue state; everything lives behind [`QueueApi`].
//! Envelopes pass through untouched: the server never holds a key.
//!
//! # Usage
//!
//! ```ignore
//! use cq_03_gateway::{GatewayConfig, GatewayService};
//!
//! let config = GatewayConfig::default();
//! let store = QueueStore::new(InMemorySortedSetStore::new(), config.queue.clone());
//! let service = GatewayService::new(config, Arc::new(store))?;
//! service.run(shutdown_signal()).await?;
//! ```
//!
//! [`QueueApi`]: cq_02_queue_store::QueueApi

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod middleware;
pub mod router;
pub mod service;

// Re-exports for public API
pub use domain::config::{ConfigError, GatewayConfig, HttpConfig, LimitsConfig};
pub use domain::error::{ApiError, ApiResult, GatewayError};
pub use router::AppState;
pub use service::GatewayService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
