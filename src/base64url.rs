//! Base64url (unpadded) transport encoding for API-boundary parameters.

use base64ct::{Base64UrlUnpadded, Encoding};

use crate::error::EceError;

/// Base64url encode bytes without padding.
pub fn base64url_encode(data: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(data)
}

/// Base64url decode a string to bytes.
pub fn base64url_decode(s: &str) -> Result<Vec<u8>, base64ct::Error> {
    Base64UrlUnpadded::decode_vec(s)
}

/// Decode a named parameter, tagging failures with the field name.
pub(crate) fn decode_param(field: &'static str, s: &str) -> Result<Vec<u8>, EceError> {
    base64url_decode(s).map_err(|e| EceError::Base64Decode {
        field,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let data = b"I am the walrus";
        assert_eq!(base64url_decode(&base64url_encode(data)).unwrap(), data);
    }

    #[test]
    fn no_padding_and_url_safe() {
        let encoded = base64url_encode(&[0xfb, 0xff, 0xfe, 0x01]);
        assert!(!encoded.contains('='));
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
    }

    #[test]
    fn known_key_decodes_to_16_bytes() {
        assert_eq!(base64url_decode("yqdlZ-tYemfogSmv7Ws5PQ").unwrap().len(), 16);
    }

    #[test]
    fn decode_param_names_the_field() {
        let err = decode_param("salt", "not valid!").unwrap_err();
        assert!(err.to_string().contains("salt"));
    }
}
