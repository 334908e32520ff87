//! Content-key and nonce-base derivation.
//!
//! Input keying material comes from an explicit key, an ECDH agreement
//! against a keystore private key, or raw keystore bytes. An auth secret,
//! when present, is folded in with one HKDF pass before the main
//! extract-and-expand ladder:
//!
//! ```text
//! ikm'      = HKDF(salt = authSecret, ikm, "Content-Encoding: auth\0", 32)
//! prk       = HKDF-Extract(salt, ikm')
//! key       = HKDF-Expand(prk, keyInfo, 16)
//! nonceBase = HKDF-Expand(prk, nonceInfo, 12)
//! ```

use zeroize::{Zeroize, Zeroizing};

use crate::context;
use crate::ecdh;
use crate::error::EceError;
use crate::hkdf::{self, Prk};
use crate::keystore::{KeyEntry, KeyStore};
use crate::types::{Resolved, Variant, KEY_LENGTH, NONCE_LENGTH};

/// Which side of the exchange is running; decides the DH context roles.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Encrypt,
    Decrypt,
}

/// The derived content-encryption key and nonce base.
pub(crate) struct RecordKeys {
    pub key: [u8; KEY_LENGTH],
    pub nonce_base: [u8; NONCE_LENGTH],
}

impl Drop for RecordKeys {
    fn drop(&mut self) {
        self.key.zeroize();
        self.nonce_base.zeroize();
    }
}

/// Run the key schedule for one operation.
pub(crate) fn derive_record_keys(
    store: &KeyStore,
    input: &Resolved,
    mode: Mode,
) -> Result<RecordKeys, EceError> {
    let (ikm, dh_context) = resolve_ikm(store, input, mode)?;

    let ikm = match &input.auth_secret {
        Some(auth) => {
            let mut mixed = Zeroizing::new(vec![0u8; 32]);
            hkdf::derive(auth, &ikm, context::AUTH_INFO, &mut mixed)?;
            mixed
        }
        None => ikm,
    };

    let prk = Prk::extract(&input.salt, &ikm);
    let mut keys = RecordKeys {
        key: [0u8; KEY_LENGTH],
        nonce_base: [0u8; NONCE_LENGTH],
    };
    prk.expand(&context::key_info(input.variant, &dh_context), &mut keys.key)?;
    prk.expand(
        &context::nonce_info(input.variant, &dh_context),
        &mut keys.nonce_base,
    )?;
    Ok(keys)
}

/// Resolve the input keying material and, for `aesgcm` over ECDH, the
/// context blob that binds both public keys into the info strings.
fn resolve_ikm(
    store: &KeyStore,
    input: &Resolved,
    mode: Mode,
) -> Result<(Zeroizing<Vec<u8>>, Vec<u8>), EceError> {
    if let Some(key) = &input.key {
        if key.len() != KEY_LENGTH {
            return Err(EceError::BadKeyLength {
                expected: KEY_LENGTH,
                got: key.len(),
            });
        }
        return Ok((key.clone(), Vec::new()));
    }

    if let Some(peer) = &input.dh {
        let id = input.keyid.as_deref().unwrap_or("");
        let entry = store
            .get(id)
            .ok_or_else(|| EceError::UnknownKeyId(id.to_string()))?;
        return match &entry {
            KeyEntry::Raw(_) => Err(EceError::MissingDhLabel(id.to_string())),
            KeyEntry::Ecdh { secret, label } => {
                let ikm = ecdh::shared_secret(secret, peer)?;
                let blob = if input.variant == Variant::AesGcm {
                    let local = ecdh::public_key_bytes(secret);
                    let (recipient, sender) = match mode {
                        Mode::Encrypt => (peer.as_slice(), local.as_slice()),
                        Mode::Decrypt => (local.as_slice(), peer.as_slice()),
                    };
                    context::dh_context(label, recipient, sender)
                } else {
                    Vec::new()
                };
                Ok((ikm, blob))
            }
        };
    }

    if let Some(id) = &input.keyid {
        let entry = store
            .get(id)
            .ok_or_else(|| EceError::UnknownKeyId(id.clone()))?;
        return match &entry {
            KeyEntry::Raw(key) => Ok((Zeroizing::new(key.clone()), Vec::new())),
            // An ECDH entry is unusable without the peer's public key.
            KeyEntry::Ecdh { .. } => Err(EceError::MissingKeyMaterial),
        };
    }

    Err(EceError::MissingKeyMaterial)
}
