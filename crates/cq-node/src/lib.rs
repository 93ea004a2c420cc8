//! # Cipher-Queue Node
//!
//! Wires one Queue Store to the HTTP gateway. The `cq-node` binary is a thin
//! shell around [`NodeRuntime`]; the library exists so startup can be tested.
//!
//! ## Startup Sequence
//!
//! 1. Install logging (`cq-telemetry`)
//! 2. Load [`NodeConfig`] from the environment
//! 3. Connect the backend (memory, or redis with the `redis` feature)
//! 4. Bind and serve until Ctrl+C / SIGTERM
//! 5. Drain in-flight requests for `http.shutdown_grace`

pub mod config;
pub mod runtime;

pub use config::{BackendConfig, NodeConfig, NodeConfigError};
pub use runtime::{NodeError, NodeRuntime};
