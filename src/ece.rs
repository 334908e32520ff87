//! Parameter decoding, validation, and the public operations.
//!
//! The legacy encodings carry salt, record size, and key identifiers out
//! of band, so every input arrives through [`Params`]. `aes128gcm` writes
//! its header onto the wire on encrypt and trusts the wire copy on
//! decrypt.

use zeroize::Zeroizing;

use crate::base64url::decode_param;
use crate::ecdh;
use crate::error::EceError;
use crate::framing;
use crate::header::Header;
use crate::keystore::{default_keystore, KeyStore};
use crate::schedule::{self, Mode};
use crate::types::{Params, Resolved, Variant, DEFAULT_RECORD_SIZE, SALT_LENGTH};

/// Encrypt `plaintext` under `params` with the process-wide keystore.
pub fn encrypt(plaintext: &[u8], params: &Params) -> Result<Vec<u8>, EceError> {
    encrypt_with_keystore(plaintext, params, default_keystore())
}

/// Decrypt `ciphertext` under `params` with the process-wide keystore.
pub fn decrypt(ciphertext: &[u8], params: &Params) -> Result<Vec<u8>, EceError> {
    decrypt_with_keystore(ciphertext, params, default_keystore())
}

/// Register key material under `id` in the process-wide keystore.
///
/// `material` is base64url: raw content-key bytes, or a P-256 private
/// scalar when `dh_label` is given. The label marks the entry as an ECDH
/// key and is mixed into the `aesgcm` DH context.
pub fn save_key(id: &str, material: &str, dh_label: Option<&str>) -> Result<(), EceError> {
    save_key_with_keystore(id, material, dh_label, default_keystore())
}

/// [`encrypt`] against a caller-owned keystore.
pub fn encrypt_with_keystore(
    plaintext: &[u8],
    params: &Params,
    store: &KeyStore,
) -> Result<Vec<u8>, EceError> {
    let input = resolve(params, true)?;
    let keys = schedule::derive_record_keys(store, &input, Mode::Encrypt)?;

    let mut out = Vec::new();
    if input.variant == Variant::Aes128Gcm {
        let header = Header {
            salt: input.salt,
            rs: input.rs,
            keyid: params.keyid.as_deref().unwrap_or("").as_bytes().to_vec(),
        };
        out.reserve(header.len());
        header.write(&mut out)?;
    }
    framing::encrypt_records(&keys, input.variant, input.rs, input.pad, plaintext, &mut out)?;
    Ok(out)
}

/// [`decrypt`] against a caller-owned keystore.
pub fn decrypt_with_keystore(
    ciphertext: &[u8],
    params: &Params,
    store: &KeyStore,
) -> Result<Vec<u8>, EceError> {
    let mut input = resolve(params, false)?;

    let payload = if input.variant == Variant::Aes128Gcm {
        let (header, consumed) = Header::parse(ciphertext)?;
        if header.rs < Variant::Aes128Gcm.min_rs() {
            return Err(EceError::BadRecordSize(header.rs));
        }
        input.salt = header.salt;
        input.rs = header.rs;
        if !header.keyid.is_empty() {
            let id = String::from_utf8(header.keyid)
                .map_err(|e| EceError::UnknownKeyId(String::from_utf8_lossy(e.as_bytes()).into_owned()))?;
            input.keyid = Some(id);
        }
        &ciphertext[consumed..]
    } else {
        ciphertext
    };

    let keys = schedule::derive_record_keys(store, &input, Mode::Decrypt)?;
    framing::decrypt_records(&keys, input.variant, input.rs, payload)
}

/// [`save_key`] against a caller-owned keystore.
pub fn save_key_with_keystore(
    id: &str,
    material: &str,
    dh_label: Option<&str>,
    store: &KeyStore,
) -> Result<(), EceError> {
    let bytes = Zeroizing::new(decode_param("key material", material)?);
    match dh_label {
        Some(label) => {
            let secret = ecdh::parse_private_key(&bytes)?;
            store.save_ecdh(id, secret, label);
        }
        None => store.save_raw(id, &bytes),
    }
    Ok(())
}

/// Decode the base64url fields and validate what can be validated before
/// any key material is touched.
fn resolve(params: &Params, encrypting: bool) -> Result<Resolved, EceError> {
    let variant = params.variant;

    let rs = params.rs.unwrap_or(DEFAULT_RECORD_SIZE);
    // On aes128gcm decrypt the wire header's rs governs instead.
    if (encrypting || variant != Variant::Aes128Gcm) && rs < variant.min_rs() {
        return Err(EceError::BadRecordSize(rs));
    }

    let key = params
        .key
        .as_deref()
        .map(|s| decode_param("key", s))
        .transpose()?
        .map(Zeroizing::new);
    let dh = params
        .dh
        .as_deref()
        .map(|s| decode_param("dh", s))
        .transpose()?;
    let auth_secret = params
        .auth_secret
        .as_deref()
        .map(|s| decode_param("authSecret", s))
        .transpose()?
        .map(Zeroizing::new);

    let salt = match params.salt.as_deref() {
        Some(s) => {
            let bytes = decode_param("salt", s)?;
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| EceError::BadSaltLength {
                    expected: SALT_LENGTH,
                    got: bytes.len(),
                })?
        }
        None => match variant {
            Variant::Aes128Gcm if encrypting => random_salt()?,
            // Filled from the wire header before key derivation.
            Variant::Aes128Gcm => [0u8; SALT_LENGTH],
            _ => return Err(EceError::MissingSalt(variant.name())),
        },
    };

    Ok(Resolved {
        variant,
        salt,
        rs,
        key,
        keyid: params.keyid.clone(),
        dh,
        auth_secret,
        pad: if encrypting { params.pad.unwrap_or(0) } else { 0 },
    })
}

fn random_salt() -> Result<[u8; SALT_LENGTH], EceError> {
    let mut salt = [0u8; SALT_LENGTH];
    getrandom::getrandom(&mut salt).map_err(|e| EceError::RngFailed(e.to_string()))?;
    Ok(salt)
}
