//! Single-record sealing and opening.
//!
//! Record plaintext layout: a big-endian pad-length field (1 or 2 bytes by
//! variant), that many zero bytes, then the data. For `aes128gcm` the high
//! bit of the first field byte marks the final record of the stream.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Key, Nonce};

use crate::error::EceError;
use crate::types::{Variant, KEY_LENGTH, NONCE_LENGTH, TAG_LENGTH};

/// Delimiter flag in the first pad-field byte of an `aes128gcm` record.
const LAST_RECORD_BIT: u8 = 0x80;

pub(crate) fn cipher(key: &[u8; KEY_LENGTH]) -> Aes128Gcm {
    Aes128Gcm::new(Key::<Aes128Gcm>::from_slice(key))
}

/// XOR the 48-bit record counter into the tail of the nonce base.
///
/// Counters are never reused under one key; the framing walk assigns them
/// sequentially from zero.
pub(crate) fn derive_nonce(nonce_base: &[u8; NONCE_LENGTH], counter: u64) -> [u8; NONCE_LENGTH] {
    let mut nonce = *nonce_base;
    for (i, byte) in counter.to_be_bytes()[2..].iter().enumerate() {
        nonce[NONCE_LENGTH - 6 + i] ^= byte;
    }
    nonce
}

/// Seal one record: pad field, zero padding, data, then AES-128-GCM with
/// the tag appended.
pub(crate) fn encrypt_record(
    cipher: &Aes128Gcm,
    nonce_base: &[u8; NONCE_LENGTH],
    counter: u64,
    data: &[u8],
    pad: usize,
    variant: Variant,
    last: bool,
) -> Result<Vec<u8>, EceError> {
    let pad_size = variant.pad_size();
    let mut block = Vec::with_capacity(pad_size + pad + data.len());
    match pad_size {
        1 => block.push(pad as u8),
        _ => block.extend_from_slice(&(pad as u16).to_be_bytes()),
    }
    if variant == Variant::Aes128Gcm && last {
        block[0] |= LAST_RECORD_BIT;
    }
    block.resize(pad_size + pad, 0);
    block.extend_from_slice(data);

    let nonce = derive_nonce(nonce_base, counter);
    cipher
        .encrypt(Nonce::from_slice(&nonce), block.as_slice())
        .map_err(|_| EceError::AeadFailure)
}

/// Open one record and strip its padding.
///
/// `last` is the caller's position-derived view; for `aes128gcm` it must
/// agree with the delimiter bit.
pub(crate) fn decrypt_record(
    cipher: &Aes128Gcm,
    nonce_base: &[u8; NONCE_LENGTH],
    counter: u64,
    record: &[u8],
    variant: Variant,
    last: bool,
) -> Result<Vec<u8>, EceError> {
    if record.len() <= TAG_LENGTH {
        return Err(EceError::BlockTooSmall(record.len()));
    }

    let nonce = derive_nonce(nonce_base, counter);
    let mut block = cipher
        .decrypt(Nonce::from_slice(&nonce), record)
        .map_err(|_| EceError::AeadFailure)?;

    let pad_size = variant.pad_size();
    if block.len() < pad_size {
        return Err(EceError::InvalidPadding);
    }
    let pad = match variant {
        Variant::AesGcm128 => block[0] as usize,
        Variant::AesGcm => u16::from_be_bytes([block[0], block[1]]) as usize,
        Variant::Aes128Gcm => {
            let delimited = block[0] & LAST_RECORD_BIT != 0;
            if delimited && !last {
                return Err(EceError::InvalidPadding);
            }
            if !delimited && last {
                return Err(EceError::TruncatedPayload);
            }
            u16::from_be_bytes([block[0] & !LAST_RECORD_BIT, block[1]]) as usize
        }
    };
    if pad_size + pad > block.len() {
        return Err(EceError::InvalidPadding);
    }
    if block[pad_size..pad_size + pad].iter().any(|&b| b != 0) {
        return Err(EceError::InvalidPadding);
    }
    Ok(block.split_off(pad_size + pad))
}
