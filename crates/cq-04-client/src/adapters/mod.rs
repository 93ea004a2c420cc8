//! Transport adapters.

pub mod http;

pub use http::HttpTransport;
