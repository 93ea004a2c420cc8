//! # Envelope Codec
//!
//! Wire-compatible sealing of queue events, shared by producers and consumers.
//!
//! ## Pipeline
//!
//! ```text
//! seal:  event ──JSON (compact)──→ zstd ──XChaCha20-Poly1305──→ nonce‖ct ──base64──→ envelope
//! open:  envelope ──base64──→ nonce‖ct ──AEAD verify/decrypt──→ zstd⁻¹ ──JSON──→ event
//! ```
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `kdf` | scrypt (N=2^14, r=8, p=1, empty salt) | Shared secret → 256-bit key |
//! | `symmetric` | XChaCha20-Poly1305 | Authenticated encryption |
//! | `codec` | JSON + zstd + base64 | Envelope framing |
//!
//! ## Security Properties
//!
//! - **Fresh nonce per seal**: 192-bit random nonce, so sealing the same event
//!   twice yields unrelated envelopes.
//! - **All-or-nothing open**: any bit flip fails authentication before
//!   decompression is attempted; every decode failure maps to
//!   [`EnvelopeError::Corrupt`].
//! - **Derive once**: key derivation is deliberately slow; an
//!   [`EnvelopeCodec`] caches the derived key for its lifetime.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod errors;
mod finite;
pub mod kdf;
pub mod symmetric;

// Re-exports
pub use codec::{decode, encode, Event, EnvelopeCodec, MAX_PLAINTEXT_LEN};
pub use errors::EnvelopeError;
pub use kdf::{derive_key, KdfParams};
pub use symmetric::{decrypt, encrypt, Nonce, SecretKey, NONCE_LEN, TAG_LEN};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
