//! Gateway domain: configuration, errors and request parsing.

pub mod config;
pub mod error;
pub mod query;

pub use config::{ConfigError, GatewayConfig, HttpConfig, LimitsConfig};
pub use error::{ApiError, ApiResult, GatewayError};
pub use query::{parse_flag, FetchQuery};
