//! Server address pool.

use super::errors::ClientError;
use rand::seq::SliceRandom;

/// Immutable list of server base URLs.
///
/// Each call picks one uniformly at random. There is no stickiness: a
/// blocking `get` only sees events published through the same backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressPool {
    addrs: Vec<String>,
}

impl AddressPool {
    pub fn new(addrs: Vec<String>) -> Result<Self, ClientError> {
        if addrs.is_empty() {
            return Err(ClientError::Config("address pool is empty".into()));
        }
        Ok(Self { addrs })
    }

    /// Pick an address with the thread-local RNG.
    pub fn pick(&self) -> &str {
        self.pick_with(&mut rand::thread_rng())
    }

    /// Pick an address with a caller-supplied RNG.
    pub fn pick_with<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.addrs
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn addrs(&self) -> &[String] {
        &self.addrs
    }

    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }
}
