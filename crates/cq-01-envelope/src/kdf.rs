//! # Key Derivation
//!
//! scrypt over the shared secret with an empty salt: the same secret always
//! yields the same key, so any producer and consumer holding it interoperate.
//! The work factor makes offline guessing of weak secrets expensive.

use crate::{EnvelopeError, SecretKey};

/// scrypt work parameters.
///
/// [`KdfParams::default`] is the wire-compatible setting. Anything else derives
/// a different key and only interoperates with peers using the same values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// log2 of the CPU/memory cost `N`.
    pub log_n: u8,
    /// Block size `r`.
    pub r: u32,
    /// Parallelism `p`.
    pub p: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            log_n: 14,
            r: 8,
            p: 1,
        }
    }
}

/// Derive a 256-bit key from `secret`.
///
/// This is slow by design (tens of milliseconds); call it once per session.
///
/// # Errors
///
/// Returns `EnvelopeError::KeyDerivation` if scrypt rejects the parameters.
pub fn derive_key(secret: &[u8], params: KdfParams) -> Result<SecretKey, EnvelopeError> {
    let params = scrypt::Params::new(params.log_n, params.r, params.p, 32)
        .map_err(|e| EnvelopeError::KeyDerivation(e.to_string()))?;

    let mut out = [0u8; 32];
    scrypt::scrypt(secret, b"", &params, &mut out)
        .map_err(|e| EnvelopeError::KeyDerivation(e.to_string()))?;

    Ok(SecretKey::from_bytes(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: KdfParams = KdfParams {
        log_n: 4,
        r: 8,
        p: 1,
    };

    #[test]
    fn test_same_secret_same_key() {
        let a = derive_key(b"s3cret", FAST).unwrap();
        let b = derive_key(b"s3cret", FAST).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_different_secret_different_key() {
        let a = derive_key(b"s3cret", FAST).unwrap();
        let b = derive_key(b"s3cret!", FAST).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_params_change_key() {
        let a = derive_key(b"s3cret", FAST).unwrap();
        let b = derive_key(b"s3cret", KdfParams { log_n: 5, ..FAST }).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = derive_key(b"s3cret", KdfParams { log_n: 4, r: 0, p: 1 });
        assert!(matches!(result, Err(EnvelopeError::KeyDerivation(_))));
    }
}
