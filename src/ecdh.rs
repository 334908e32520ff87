//! P-256 ECDH backend.
//!
//! Public keys travel as uncompressed SEC1 points; the shared secret is the
//! raw x coordinate (32 bytes).

use p256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use p256::{EncodedPoint, PublicKey, SecretKey};
use zeroize::Zeroizing;

use crate::error::EceError;

/// Parse a raw 32-byte P-256 private scalar.
pub(crate) fn parse_private_key(bytes: &[u8]) -> Result<SecretKey, EceError> {
    SecretKey::from_slice(bytes).map_err(|e| EceError::InvalidPrivateKey(e.to_string()))
}

/// Uncompressed SEC1 encoding of the public half of a private key.
pub(crate) fn public_key_bytes(secret: &SecretKey) -> Vec<u8> {
    secret.public_key().to_encoded_point(false).as_bytes().to_vec()
}

/// Parse an uncompressed P-256 public point.
pub(crate) fn parse_public_key(bytes: &[u8]) -> Result<PublicKey, EceError> {
    let point =
        EncodedPoint::from_bytes(bytes).map_err(|e| EceError::InvalidPublicKey(e.to_string()))?;
    PublicKey::from_encoded_point(&point)
        .into_option()
        .ok_or_else(|| EceError::InvalidPublicKey("point is not on the curve".to_string()))
}

/// Raw shared x coordinate between a local private key and a peer point.
pub(crate) fn shared_secret(
    secret: &SecretKey,
    peer_public: &[u8],
) -> Result<Zeroizing<Vec<u8>>, EceError> {
    let peer = parse_public_key(peer_public)?;
    let shared = p256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), peer.as_affine());
    Ok(Zeroizing::new(shared.raw_secret_bytes().as_slice().to_vec()))
}

/// Generate a fresh P-256 key pair.
///
/// Returns the private key and its uncompressed public point, ready to be
/// registered with [`crate::KeyStore::save_ecdh`] and handed to a peer as
/// the `dh` parameter.
pub fn generate_keypair() -> (SecretKey, Vec<u8>) {
    let secret = SecretKey::random(&mut p256::elliptic_curve::rand_core::OsRng);
    let public = public_key_bytes(&secret);
    (secret, public)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_point_is_uncompressed() {
        let (_, public) = generate_keypair();
        assert_eq!(public.len(), 65);
        assert_eq!(public[0], 0x04);
    }

    #[test]
    fn agreement_is_symmetric() {
        let (a_secret, a_public) = generate_keypair();
        let (b_secret, b_public) = generate_keypair();
        let ab = shared_secret(&a_secret, &b_public).unwrap();
        let ba = shared_secret(&b_secret, &a_public).unwrap();
        assert_eq!(*ab, *ba);
        assert_eq!(ab.len(), 32);
    }

    #[test]
    fn rejects_garbage_public_key() {
        let (secret, _) = generate_keypair();
        assert!(shared_secret(&secret, &[0x04; 65]).is_err());
        assert!(shared_secret(&secret, b"short").is_err());
    }

    #[test]
    fn private_key_round_trips_through_bytes() {
        let (secret, public) = generate_keypair();
        let restored = parse_private_key(secret.to_bytes().as_slice()).unwrap();
        assert_eq!(public_key_bytes(&restored), public);
    }

    #[test]
    fn rejects_zero_scalar() {
        assert!(parse_private_key(&[0u8; 32]).is_err());
    }
}
