//! # Cipher-Queue Test Suite
//!
//! End-to-end tests that run a real gateway on a loopback port and talk to it
//! through the client library or raw HTTP.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── mod.rs       # TestNode harness
//!     ├── flows.rs     # put/get/ack/clear through QueueSession
//!     ├── blocking.rs  # blocking fetch and bounded polling
//!     ├── cli.rs       # `cq` commands against a live node
//!     └── wire.rs      # raw HTTP contract
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cq-tests
//! cargo test -p cq-tests integration::blocking::
//! ```

pub mod integration;
