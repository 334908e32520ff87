//! Encrypted Content-Encoding for HTTP.
//!
//! Implements the `aesgcm128`, `aesgcm`, and `aes128gcm` content encodings
//! used by Web Push: plaintext is split into AES-128-GCM records under a
//! key and nonce base derived with HKDF-SHA256 from an explicit key, a
//! stored key, or a P-256 ECDH agreement with an optional auth secret.

mod context;
mod ece;
mod ecdh;
mod framing;
mod header;
mod hkdf;
mod record;
mod schedule;

pub mod base64url;
pub mod error;
pub mod keystore;
pub mod types;

pub use base64url::{base64url_decode, base64url_encode};
pub use ece::{
    decrypt, decrypt_with_keystore, encrypt, encrypt_with_keystore, save_key,
    save_key_with_keystore,
};
pub use ecdh::generate_keypair;
pub use error::EceError;
pub use keystore::{default_keystore, KeyStore};
pub use types::{Params, Variant};
