//! HKDF `info` construction for the three content encodings.
//!
//! `aesgcm128` uses the bare ASCII labels with no terminator. The newer
//! encodings append a NUL and a context blob; only `aesgcm` puts anything
//! in the blob (the key label plus both public keys, length-prefixed).

use crate::types::Variant;

/// Info string for the auth-secret mixing step.
pub(crate) const AUTH_INFO: &[u8] = b"Content-Encoding: auth\0";

/// Info string for content-key derivation.
pub(crate) fn key_info(variant: Variant, dh_context: &[u8]) -> Vec<u8> {
    match variant {
        Variant::AesGcm128 => b"Content-Encoding: aesgcm128".to_vec(),
        Variant::AesGcm => [b"Content-Encoding: aesgcm\0".as_slice(), dh_context].concat(),
        Variant::Aes128Gcm => b"Content-Encoding: aes128gcm\0".to_vec(),
    }
}

/// Info string for nonce-base derivation.
pub(crate) fn nonce_info(variant: Variant, dh_context: &[u8]) -> Vec<u8> {
    match variant {
        Variant::AesGcm128 => b"Content-Encoding: nonce".to_vec(),
        Variant::AesGcm => [b"Content-Encoding: nonce\0".as_slice(), dh_context].concat(),
        Variant::Aes128Gcm => b"Content-Encoding: nonce\0".to_vec(),
    }
}

/// DH context blob: `label NUL lenPrefix(recipient) lenPrefix(sender)`.
///
/// The encrypting side is the sender, so the roles swap with direction;
/// both directions must produce identical bytes.
pub(crate) fn dh_context(label: &str, recipient_public: &[u8], sender_public: &[u8]) -> Vec<u8> {
    let mut out =
        Vec::with_capacity(label.len() + 5 + recipient_public.len() + sender_public.len());
    out.extend_from_slice(label.as_bytes());
    out.push(0);
    out.extend_from_slice(&(recipient_public.len() as u16).to_be_bytes());
    out.extend_from_slice(recipient_public);
    out.extend_from_slice(&(sender_public.len() as u16).to_be_bytes());
    out.extend_from_slice(sender_public);
    out
}
