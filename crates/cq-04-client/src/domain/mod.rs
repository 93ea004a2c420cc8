//! Client Session domain.

pub mod address;
pub mod config;
pub mod delivery;
pub mod errors;

pub use address::AddressPool;
pub use config::{ClientConfig, ClientConfigBuilder, PollPolicy, DEFAULT_SERVER_ADDR};
pub use delivery::{AckHandle, Delivery};
pub use errors::ClientError;
