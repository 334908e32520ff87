//! Wire constants and parameter types.

use zeroize::Zeroizing;

use crate::error::EceError;

/// AES-128 content-encryption key length in bytes.
pub const KEY_LENGTH: usize = 16;

/// HKDF salt length in bytes.
pub const SALT_LENGTH: usize = 16;

/// AES-GCM nonce length in bytes (96 bits per NIST recommendation).
pub const NONCE_LENGTH: usize = 12;

/// AES-GCM tag length in bytes (128 bits).
pub const TAG_LENGTH: usize = 16;

/// Record size used when the caller does not supply one.
pub const DEFAULT_RECORD_SIZE: u32 = 4096;

/// The three content encodings sharing the record machinery.
///
/// The variant decides the pad-field width, the HKDF info strings, and
/// whether the salt/record-size header travels in-band (`aes128gcm`) or out
/// of band (the legacy pair).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// 1-byte pad field, short-form info strings, out-of-band header.
    AesGcm128,
    /// 2-byte pad field, DH context in the info strings, out-of-band header.
    AesGcm,
    /// 2-byte pad field, in-band binary header, last-record delimiter bit.
    #[default]
    Aes128Gcm,
}

impl Variant {
    /// Map a Content-Encoding token to its variant.
    pub fn from_name(name: &str) -> Result<Self, EceError> {
        match name {
            "aesgcm128" => Ok(Self::AesGcm128),
            "aesgcm" => Ok(Self::AesGcm),
            "aes128gcm" => Ok(Self::Aes128Gcm),
            other => Err(EceError::UnknownVariant(other.to_string())),
        }
    }

    /// The Content-Encoding token for this variant.
    pub fn name(self) -> &'static str {
        match self {
            Self::AesGcm128 => "aesgcm128",
            Self::AesGcm => "aesgcm",
            Self::Aes128Gcm => "aes128gcm",
        }
    }

    /// Width in bytes of the big-endian pad-length field.
    pub fn pad_size(self) -> usize {
        match self {
            Self::AesGcm128 => 1,
            Self::AesGcm | Self::Aes128Gcm => 2,
        }
    }

    /// Bytes of each record's `rs` budget not available for pad or data.
    /// `aes128gcm` counts the tag inside `rs`; the legacy pair put it on
    /// the wire beyond `rs`.
    pub(crate) fn record_overhead(self) -> usize {
        match self {
            Self::Aes128Gcm => self.pad_size() + TAG_LENGTH,
            _ => self.pad_size(),
        }
    }

    /// Pad-plus-data capacity of a single record.
    pub(crate) fn capacity(self, rs: u32) -> usize {
        rs as usize - self.record_overhead()
    }

    /// Largest pad count a single record can encode.
    pub(crate) fn max_pad(self) -> usize {
        match self {
            Self::AesGcm128 => 0xff,
            Self::AesGcm => 0xffff,
            // The high bit of the field is the last-record delimiter.
            Self::Aes128Gcm => 0x7fff,
        }
    }

    /// Smallest record size that advances one data byte at full padding.
    pub(crate) fn min_rs(self) -> u32 {
        (self.record_overhead() + 2) as u32
    }
}

/// Per-call parameters.
///
/// Byte-valued fields are base64url without padding; the dispatcher decodes
/// them before the key schedule runs.
#[derive(Debug, Clone, Default)]
pub struct Params {
    /// Which content encoding to apply.
    pub variant: Variant,
    /// 16-byte HKDF salt. Required for the legacy variants; generated on
    /// encrypt and read from the wire header on decrypt for `aes128gcm`.
    pub salt: Option<String>,
    /// Record size; defaults to 4096.
    pub rs: Option<u32>,
    /// Explicit 16-byte content key. Mutually exclusive with `dh`.
    pub key: Option<String>,
    /// Keystore identifier; also written to the wire for `aes128gcm`.
    pub keyid: Option<String>,
    /// Peer public key (uncompressed P-256 point) for ECDH.
    pub dh: Option<String>,
    /// Auth secret mixed in ahead of the main HKDF ladder.
    pub auth_secret: Option<String>,
    /// Total padding octets to distribute across records (encrypt only).
    pub pad: Option<usize>,
}

/// Decoded and validated inputs for one operation.
pub(crate) struct Resolved {
    pub variant: Variant,
    pub salt: [u8; SALT_LENGTH],
    pub rs: u32,
    pub key: Option<Zeroizing<Vec<u8>>>,
    pub keyid: Option<String>,
    pub dh: Option<Vec<u8>>,
    pub auth_secret: Option<Zeroizing<Vec<u8>>>,
    pub pad: usize,
}
