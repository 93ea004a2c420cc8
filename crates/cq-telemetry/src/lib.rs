//! # Cipher-Queue Telemetry
//!
//! Structured logging for the node and the CLI.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cq_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&TelemetryConfig::from_env())?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CQ_SERVICE_NAME` | `cipher-queue` | Service name in the startup line |
//! | `CQ_LOG_LEVEL` | `info` | Filter directive (falls back to `RUST_LOG`) |
//! | `CQ_JSON_LOGS` | `false` (`true` in containers) | JSON output |
//! | `NO_COLOR` | unset | Disable ANSI colours |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    Filter(String),

    #[error("global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}
