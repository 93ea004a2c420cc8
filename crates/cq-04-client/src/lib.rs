//! # Client Session
//!
//! Producer/consumer handle for one encrypted queue.
//!
//! ## Architecture
//!
//! ```text
//!   application
//!       │  put / get / ack / clear
//!       ▼
//! ┌───────────────┐   seal/open   ┌────────────────┐
//! │ QueueSession  │──────────────▶│ EnvelopeCodec  │
//! └──────┬────────┘               └────────────────┘
//!        │ random address per call
//!        ▼
//! ┌───────────────┐
//! │ Transport     │  (port)
//! │  HttpTransport│  (reqwest adapter)
//! └───────────────┘
//! ```
//!
//! Events are sealed before they leave the process; servers only ever see
//! ciphertext. The secret is turned into a key once, when the session opens.
//!
//! ## Example
//!
//! ```no_run
//! use cq_04_client::{ClientConfig, QueueSession};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), cq_04_client::ClientError> {
//! let session = QueueSession::connect("orders", "k1", "s3cret", ClientConfig::from_env()?)?;
//! session.put(&json!({"sku": 42})).await?;
//!
//! if let Some(delivery) = session.get(false, true).await? {
//!     println!("{:?}", delivery.event);
//!     delivery.ack().await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod session;

pub use adapters::HttpTransport;
pub use domain::{
    AckHandle, AddressPool, ClientConfig, ClientConfigBuilder, ClientError, Delivery, PollPolicy,
    DEFAULT_SERVER_ADDR,
};
pub use ports::{Transport, TransportError, TransportOutcome};
pub use session::QueueSession;
