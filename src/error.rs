use thiserror::Error;

#[derive(Debug, Error)]
pub enum EceError {
    #[error("salt is required for {0}")]
    MissingSalt(&'static str),

    #[error("salt must be {expected} bytes, got {got}")]
    BadSaltLength { expected: usize, got: usize },

    #[error("content key must be {expected} bytes, got {got}")]
    BadKeyLength { expected: usize, got: usize },

    #[error("none of key, dh or keyid resolved to key material")]
    MissingKeyMaterial,

    #[error("no key registered under id {0:?}")]
    UnknownKeyId(String),

    #[error("key {0:?} was not registered with a DH label")]
    MissingDhLabel(String),

    #[error("record size {0} is too small")]
    BadRecordSize(u32),

    #[error("keyid is {0} bytes, limit is 255")]
    KeyIdTooLong(usize),

    #[error("payload ends without a final record")]
    TruncatedPayload,

    #[error("record of {0} bytes is too small to authenticate")]
    BlockTooSmall(usize),

    #[error("record authentication failed")]
    AeadFailure,

    #[error("record padding is malformed")]
    InvalidPadding,

    #[error("could not distribute {0} leftover padding bytes")]
    PadBudgetExhausted(usize),

    #[error("unknown content encoding {0:?}")]
    UnknownVariant(String),

    #[error("parameter {field} is not valid base64url: {reason}")]
    Base64Decode { field: &'static str, reason: String },

    #[error("invalid P-256 public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid P-256 private key: {0}")]
    InvalidPrivateKey(String),

    #[error("random number generation failed: {0}")]
    RngFailed(String),

    #[error("key derivation failed: {0}")]
    KeyDerivationFailed(String),
}
