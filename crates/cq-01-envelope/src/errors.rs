//! Envelope error types.

use thiserror::Error;

/// Envelope codec errors.
///
/// Decode failures are deliberately collapsed into [`EnvelopeError::Corrupt`]:
/// a consumer cannot tell (and must not care) whether the tag, the compression
/// frame or the JSON was damaged.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Event is not a JSON object.
    #[error("event must be a JSON object; encode binary data with base64 or base85")]
    NotAnObject,

    /// Event could not be serialized to JSON.
    #[error("event is not JSON-serializable: {0}")]
    NotSerializable(String),

    /// Event holds a NaN or infinite number, which JSON cannot carry.
    #[error("event contains a non-finite number: {0}")]
    NonFiniteNumber(String),

    /// Envelope failed authentication or could not be decoded.
    #[error("corrupt or tampered envelope")]
    Corrupt,

    /// Encryption failed
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// Compression failed
    #[error("compression failed: {0}")]
    CompressionFailed(String),

    /// Key derivation rejected its parameters
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
}

impl EnvelopeError {
    /// True for errors caused by the caller's input, raised before any I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NotAnObject | Self::NotSerializable(_) | Self::NonFiniteNumber(_)
        )
    }
}
