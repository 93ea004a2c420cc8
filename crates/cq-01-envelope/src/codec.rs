//! # Envelope Framing
//!
//! Turns a plaintext event into the text envelope stored by the server and
//! back again.
//!
//! ## Wire Layout
//!
//! `base64(nonce[24] ‖ XChaCha20-Poly1305(zstd(compact_json(event))))`

use crate::finite::{check_finite, FiniteError};
use crate::kdf::{derive_key, KdfParams};
use crate::symmetric::{decrypt, encrypt, Nonce, SecretKey, NONCE_LEN, TAG_LEN};
use crate::EnvelopeError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Read;
use tracing::debug;

/// A plaintext event: string keys mapped to JSON values.
pub type Event = Map<String, Value>;

/// Largest decompressed plaintext accepted by [`EnvelopeCodec::open`].
pub const MAX_PLAINTEXT_LEN: usize = 16 * 1024 * 1024;

const ZSTD_LEVEL: i32 = 3;

/// Seals and opens envelopes under one derived key.
///
/// Cheap to clone; the expensive key derivation happens once in
/// [`EnvelopeCodec::from_secret`].
#[derive(Clone, Debug)]
pub struct EnvelopeCodec {
    key: SecretKey,
}

impl EnvelopeCodec {
    /// Derive the key for `secret` with the wire-compatible parameters.
    pub fn from_secret(secret: impl AsRef<[u8]>) -> Result<Self, EnvelopeError> {
        Self::from_secret_with_params(secret, KdfParams::default())
    }

    /// Derive the key for `secret` with custom scrypt parameters.
    pub fn from_secret_with_params(
        secret: impl AsRef<[u8]>,
        params: KdfParams,
    ) -> Result<Self, EnvelopeError> {
        Ok(Self {
            key: derive_key(secret.as_ref(), params)?,
        })
    }

    /// Use an already derived key.
    pub fn with_key(key: SecretKey) -> Self {
        Self { key }
    }

    /// Check that `event` serializes to a JSON object and return that object.
    ///
    /// Runs before any compression or encryption so that invalid input never
    /// produces an envelope. NaN and infinities are rejected rather than
    /// written as `null`.
    pub fn validate<T: Serialize + ?Sized>(event: &T) -> Result<Event, EnvelopeError> {
        match check_finite(event) {
            Ok(()) => {}
            Err(FiniteError::NonFinite(v)) => return Err(EnvelopeError::NonFiniteNumber(v.to_string())),
            Err(FiniteError::Custom(msg)) => return Err(EnvelopeError::NotSerializable(msg)),
        }
        match serde_json::to_value(event) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(EnvelopeError::NotAnObject),
            Err(e) => Err(EnvelopeError::NotSerializable(e.to_string())),
        }
    }

    /// Seal any serializable value that renders as a JSON object.
    pub fn seal<T: Serialize + ?Sized>(&self, event: &T) -> Result<String, EnvelopeError> {
        let event = Self::validate(event)?;
        self.seal_event(&event)
    }

    /// Seal an already validated event.
    pub fn seal_event(&self, event: &Event) -> Result<String, EnvelopeError> {
        let json =
            serde_json::to_vec(event).map_err(|e| EnvelopeError::NotSerializable(e.to_string()))?;
        let compressed = zstd::stream::encode_all(json.as_slice(), ZSTD_LEVEL)
            .map_err(|e| EnvelopeError::CompressionFailed(e.to_string()))?;
        let (ciphertext, nonce) = encrypt(&self.key, &compressed)?;

        let mut framed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        framed.extend_from_slice(nonce.as_bytes());
        framed.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(framed))
    }

    /// Open an envelope.
    ///
    /// # Errors
    ///
    /// Every failure (bad base64, short frame, tag mismatch, bad zstd frame,
    /// oversized plaintext, bad JSON, non-object JSON) is
    /// `EnvelopeError::Corrupt`.
    pub fn open(&self, envelope: &str) -> Result<Event, EnvelopeError> {
        let framed = BASE64.decode(envelope.trim()).map_err(|e| {
            debug!(error = %e, "envelope is not valid base64");
            EnvelopeError::Corrupt
        })?;
        if framed.len() < NONCE_LEN + TAG_LEN {
            debug!(len = framed.len(), "envelope shorter than nonce and tag");
            return Err(EnvelopeError::Corrupt);
        }

        let (nonce, ciphertext) = framed.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce).ok_or(EnvelopeError::Corrupt)?;
        let compressed = decrypt(&self.key, ciphertext, &nonce)?;

        let json = decompress_bounded(&compressed)?;
        match serde_json::from_slice(&json) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => {
                debug!("envelope plaintext is not a JSON object");
                Err(EnvelopeError::Corrupt)
            }
            Err(e) => {
                debug!(error = %e, "envelope plaintext is not JSON");
                Err(EnvelopeError::Corrupt)
            }
        }
    }
}

fn decompress_bounded(compressed: &[u8]) -> Result<Vec<u8>, EnvelopeError> {
    let decoder = zstd::stream::read::Decoder::new(compressed).map_err(|e| {
        debug!(error = %e, "zstd decoder init failed");
        EnvelopeError::Corrupt
    })?;

    let mut out = Vec::new();
    decoder
        .take(MAX_PLAINTEXT_LEN as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| {
            debug!(error = %e, "zstd frame is damaged");
            EnvelopeError::Corrupt
        })?;

    if out.len() > MAX_PLAINTEXT_LEN {
        debug!(limit = MAX_PLAINTEXT_LEN, "decompressed plaintext over limit");
        return Err(EnvelopeError::Corrupt);
    }
    Ok(out)
}

/// One-shot seal: derives the key from `secret` and seals `event`.
///
/// Key derivation dominates the cost; prefer an [`EnvelopeCodec`] for more
/// than one message.
pub fn encode<T: Serialize + ?Sized>(
    secret: impl AsRef<[u8]>,
    event: &T,
) -> Result<String, EnvelopeError> {
    // Validate first: a bad event must not pay for key derivation.
    let event = EnvelopeCodec::validate(event)?;
    EnvelopeCodec::from_secret(secret)?.seal_event(&event)
}

/// One-shot open: derives the key from `secret` and opens `envelope`.
pub fn decode(secret: impl AsRef<[u8]>, envelope: &str) -> Result<Event, EnvelopeError> {
    EnvelopeCodec::from_secret(secret)?.open(envelope)
}
