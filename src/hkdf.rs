//! HKDF-SHA256 key derivation (RFC 5869).
//!
//! The key schedule runs one extract and then expands twice with different
//! info strings, so extract and expand are exposed as separate steps.

use hkdf::Hkdf;
use sha2::Sha256;

use crate::error::EceError;

/// A pseudo-random key produced by HKDF-Extract, ready to expand.
pub(crate) struct Prk(Hkdf<Sha256>);

impl Prk {
    /// `HKDF-Extract(salt, ikm)`.
    pub fn extract(salt: &[u8], ikm: &[u8]) -> Self {
        Self(Hkdf::<Sha256>::new(Some(salt), ikm))
    }

    /// `HKDF-Expand(prk, info, okm.len())`.
    pub fn expand(&self, info: &[u8], okm: &mut [u8]) -> Result<(), EceError> {
        self.0
            .expand(info, okm)
            .map_err(|e| EceError::KeyDerivationFailed(format!("HKDF expand: {}", e)))
    }
}

/// One-shot extract-then-expand.
pub(crate) fn derive(salt: &[u8], ikm: &[u8], info: &[u8], okm: &mut [u8]) -> Result<(), EceError> {
    Prk::extract(salt, ikm).expand(info, okm)
}
