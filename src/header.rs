//! The `aes128gcm` wire header.
//!
//! ```text
//! salt   : 16 bytes
//! rs     :  4 bytes, big-endian
//! idlen  :  1 byte
//! keyid  :  idlen bytes
//! ```

use crate::error::EceError;
use crate::types::SALT_LENGTH;

/// Bytes before the variable-length keyid.
pub(crate) const BASE_LENGTH: usize = SALT_LENGTH + 4 + 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Header {
    pub salt: [u8; SALT_LENGTH],
    pub rs: u32,
    pub keyid: Vec<u8>,
}

impl Header {
    /// Encoded length of this header.
    pub fn len(&self) -> usize {
        BASE_LENGTH + self.keyid.len()
    }

    /// Append the encoded header to `out`.
    pub fn write(&self, out: &mut Vec<u8>) -> Result<(), EceError> {
        if self.keyid.len() > 255 {
            return Err(EceError::KeyIdTooLong(self.keyid.len()));
        }
        out.extend_from_slice(&self.salt);
        out.extend_from_slice(&self.rs.to_be_bytes());
        out.push(self.keyid.len() as u8);
        out.extend_from_slice(&self.keyid);
        Ok(())
    }

    /// Parse a header from the front of `input`; returns it together with
    /// the number of bytes consumed so framing can start past it.
    pub fn parse(input: &[u8]) -> Result<(Self, usize), EceError> {
        if input.len() < BASE_LENGTH {
            return Err(EceError::TruncatedPayload);
        }
        let mut salt = [0u8; SALT_LENGTH];
        salt.copy_from_slice(&input[..SALT_LENGTH]);
        let rs = u32::from_be_bytes(
            input[SALT_LENGTH..SALT_LENGTH + 4]
                .try_into()
                .expect("slice is exactly 4 bytes"),
        );
        let idlen = input[SALT_LENGTH + 4] as usize;
        if input.len() < BASE_LENGTH + idlen {
            return Err(EceError::TruncatedPayload);
        }
        let keyid = input[BASE_LENGTH..BASE_LENGTH + idlen].to_vec();
        Ok((Self { salt, rs, keyid }, BASE_LENGTH + idlen))
    }
}
