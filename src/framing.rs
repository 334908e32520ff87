//! Record layout and multi-record framing.
//!
//! The legacy encodings put `rs` plaintext-side bytes in each record and
//! carry the 16-byte tag beyond `rs` on the wire; end-of-stream is a
//! mandatory short final record, so a full-size record ending exactly at
//! the buffer is truncation. `aes128gcm` fixes the wire record at `rs`
//! bytes including the tag and marks the final record with the delimiter
//! bit instead.

use crate::error::EceError;
use crate::record;
use crate::schedule::RecordKeys;
use crate::types::{Variant, TAG_LENGTH};

/// One planned record: data bounds into the plaintext, its pad share, and
/// whether it terminates the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordSpec {
    pub start: usize,
    pub end: usize,
    pub pad: usize,
    pub last: bool,
}

/// Distribute the data and pad budget across records.
///
/// Padding is assigned greedily, capped so every record still advances at
/// least one data byte: `recordPad = min(maxPad, capacity - 1, remaining)`.
/// The data pointer advances by `capacity - recordPad` whether or not that
/// much data remains, and iteration runs one step past the end so an
/// exact-fit input still gets its terminating record. Budget left over
/// when the walk ends cannot be represented.
pub(crate) fn plan_records(
    variant: Variant,
    rs: u32,
    pad_budget: usize,
    len: usize,
) -> Result<Vec<RecordSpec>, EceError> {
    let capacity = variant.capacity(rs);
    let max_pad = variant.max_pad();
    let mut specs = Vec::new();
    let mut pad_left = pad_budget;
    let mut start = 0usize;
    loop {
        let pad = max_pad.min(capacity - 1).min(pad_left);
        pad_left -= pad;
        let advance = capacity - pad;
        specs.push(RecordSpec {
            start,
            end: len.min(start + advance),
            pad,
            last: start + advance > len,
        });
        start += advance;
        if start > len {
            break;
        }
    }
    if pad_left > 0 {
        return Err(EceError::PadBudgetExhausted(pad_left));
    }
    Ok(specs)
}

/// Wire size of one planned record.
fn wire_len(variant: Variant, spec: &RecordSpec) -> usize {
    variant.pad_size() + spec.pad + (spec.end - spec.start) + TAG_LENGTH
}

/// Seal `plaintext` into records appended to `out`.
pub(crate) fn encrypt_records(
    keys: &RecordKeys,
    variant: Variant,
    rs: u32,
    pad_budget: usize,
    plaintext: &[u8],
    out: &mut Vec<u8>,
) -> Result<(), EceError> {
    let specs = plan_records(variant, rs, pad_budget, plaintext.len())?;
    let total: usize = specs.iter().map(|s| wire_len(variant, s)).sum();
    out.reserve_exact(total);

    let cipher = record::cipher(&keys.key);
    for (counter, spec) in specs.iter().enumerate() {
        let sealed = record::encrypt_record(
            &cipher,
            &keys.nonce_base,
            counter as u64,
            &plaintext[spec.start..spec.end],
            spec.pad,
            variant,
            spec.last,
        )?;
        out.extend_from_slice(&sealed);
    }
    Ok(())
}

/// Walk the records of `payload` and reassemble the plaintext.
pub(crate) fn decrypt_records(
    keys: &RecordKeys,
    variant: Variant,
    rs: u32,
    payload: &[u8],
) -> Result<Vec<u8>, EceError> {
    if payload.is_empty() {
        return Err(EceError::TruncatedPayload);
    }
    let chunk = match variant {
        Variant::Aes128Gcm => rs as usize,
        _ => rs as usize + TAG_LENGTH,
    };

    let cipher = record::cipher(&keys.key);
    let mut out = Vec::with_capacity(payload.len());
    let mut start = 0usize;
    let mut counter = 0u64;
    while start < payload.len() {
        let end = payload.len().min(start + chunk);
        let last = end == payload.len();
        // The legacy stream terminator is a short record; a full-size
        // record flush with the buffer end means the terminator was lost.
        if last && variant != Variant::Aes128Gcm && end - start == chunk {
            return Err(EceError::TruncatedPayload);
        }
        let data = record::decrypt_record(
            &cipher,
            &keys.nonce_base,
            counter,
            &payload[start..end],
            variant,
            last,
        )?;
        out.extend_from_slice(&data);
        start = end;
        counter += 1;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KEY_LENGTH, NONCE_LENGTH};

    fn keys() -> RecordKeys {
        RecordKeys {
            key: [0x6eu8; KEY_LENGTH],
            nonce_base: [0x31u8; NONCE_LENGTH],
        }
    }

    fn roundtrip(variant: Variant, rs: u32, pad: usize, plaintext: &[u8]) -> Vec<u8> {
        let keys = keys();
        let mut wire = Vec::new();
        encrypt_records(&keys, variant, rs, pad, plaintext, &mut wire).unwrap();
        let recovered = decrypt_records(&keys, variant, rs, &wire).unwrap();
        assert_eq!(recovered, plaintext);
        wire
    }

    #[test]
    fn single_record_plan() {
        let specs = plan_records(Variant::Aes128Gcm, 4096, 0, 15).unwrap();
        assert_eq!(
            specs,
            vec![RecordSpec { start: 0, end: 15, pad: 0, last: true }]
        );
    }

    #[test]
    fn exact_fit_gets_a_terminal_record() {
        // capacity is 24 at rs=25 for aesgcm128
        let specs = plan_records(Variant::AesGcm128, 25, 0, 48).unwrap();
        assert_eq!(specs.len(), 3);
        assert_eq!(specs[2].start, 48);
        assert_eq!(specs[2].end, 48);
        assert!(specs[2].last);
        assert!(!specs[0].last && !specs[1].last);
    }

    #[test]
    fn greedy_pad_fills_early_records() {
        // aesgcm128 caps each record at 255 pad octets.
        let specs = plan_records(Variant::AesGcm128, 4096, 600, 12_000).unwrap();
        assert_eq!(specs[0].pad, 255);
        assert_eq!(specs[1].pad, 255);
        assert_eq!(specs[2].pad, 90);
        assert_eq!(specs.iter().map(|s| s.pad).sum::<usize>(), 600);
    }

    #[test]
    fn pad_shrinks_the_data_advance() {
        let specs = plan_records(Variant::AesGcm, 4096, 100, 10_000).unwrap();
        assert_eq!(specs[0].end, 4094 - 100);
        assert_eq!(specs[1].start, 3994);
    }

    #[test]
    fn scenario_pad_100_over_50_bytes_is_one_record() {
        let specs = plan_records(Variant::Aes128Gcm, 4096, 100, 50).unwrap();
        assert_eq!(
            specs,
            vec![RecordSpec { start: 0, end: 50, pad: 100, last: true }]
        );
        assert_eq!(wire_len(Variant::Aes128Gcm, &specs[0]), 168);
    }

    #[test]
    fn unplaceable_pad_budget_errors() {
        // One tiny record's worth of data cannot absorb this much pad.
        let err = plan_records(Variant::AesGcm, 4, 5, 0).unwrap_err();
        assert!(matches!(err, EceError::PadBudgetExhausted(4)));
    }

    #[test]
    fn empty_plaintext_is_one_pad_only_record() {
        for variant in [Variant::AesGcm128, Variant::AesGcm, Variant::Aes128Gcm] {
            let specs = plan_records(variant, 4096, 0, 0).unwrap();
            assert_eq!(specs.len(), 1);
            assert_eq!(specs[0].end, 0);
            assert!(specs[0].last);
        }
    }

    #[test]
    fn legacy_wire_records_are_rs_plus_tag() {
        let wire = roundtrip(Variant::AesGcm128, 25, 0, &[0x55u8; 41]);
        // One full record (41 wire bytes) and a 17-data-byte short record.
        assert_eq!(wire.len(), (25 + 16) + (1 + 17 + 16));
    }

    #[test]
    fn aes128gcm_wire_records_are_rs() {
        let keys = keys();
        let mut wire = Vec::new();
        // capacity 12 at rs=30: two full records and a terminal short one.
        encrypt_records(&keys, Variant::Aes128Gcm, 30, 0, &[9u8; 25], &mut wire).unwrap();
        assert_eq!(wire.len(), 30 + 30 + (2 + 1 + 16));
        assert_eq!(
            decrypt_records(&keys, Variant::Aes128Gcm, 30, &wire).unwrap(),
            [9u8; 25]
        );
    }

    #[test]
    fn multi_record_round_trips() {
        roundtrip(Variant::AesGcm, 64, 0, &[7u8; 1000]);
        roundtrip(Variant::Aes128Gcm, 64, 0, &[8u8; 1000]);
        roundtrip(Variant::AesGcm128, 25, 30, &[1u8; 100]);
    }

    #[test]
    fn legacy_full_size_final_record_is_truncation() {
        let keys = keys();
        let mut wire = Vec::new();
        encrypt_records(&keys, Variant::AesGcm128, 25, 0, &[0x55u8; 41], &mut wire).unwrap();
        // Drop the short terminal record, leaving the full one flush.
        wire.truncate(25 + 16);
        assert!(matches!(
            decrypt_records(&keys, Variant::AesGcm128, 25, &wire),
            Err(EceError::TruncatedPayload)
        ));
    }

    #[test]
    fn aes128gcm_missing_delimiter_is_truncation() {
        let keys = keys();
        let mut wire = Vec::new();
        encrypt_records(&keys, Variant::Aes128Gcm, 30, 0, &[9u8; 25], &mut wire).unwrap();
        // Remove the terminal record; the stream now ends on a full record
        // whose padding never signalled the end.
        wire.truncate(60);
        assert!(matches!(
            decrypt_records(&keys, Variant::Aes128Gcm, 30, &wire),
            Err(EceError::TruncatedPayload)
        ));
    }

    #[test]
    fn aes128gcm_early_delimiter_rejected() {
        let keys = keys();
        let cipher = record::cipher(&keys.key);
        // Hand-build two records that both claim to be last.
        let mut wire = record::encrypt_record(
            &cipher, &keys.nonce_base, 0, &[9u8; 12], 0, Variant::Aes128Gcm, true,
        )
        .unwrap();
        wire.extend(
            record::encrypt_record(
                &cipher, &keys.nonce_base, 1, b"tail", 0, Variant::Aes128Gcm, true,
            )
            .unwrap(),
        );
        assert!(matches!(
            decrypt_records(&keys, Variant::Aes128Gcm, 30, &wire),
            Err(EceError::InvalidPadding)
        ));
    }

    #[test]
    fn empty_payload_is_truncation() {
        for variant in [Variant::AesGcm128, Variant::AesGcm, Variant::Aes128Gcm] {
            assert!(matches!(
                decrypt_records(&keys(), variant, 4096, &[]),
                Err(EceError::TruncatedPayload)
            ));
        }
    }

    #[test]
    fn pad_budget_does_not_change_the_plaintext() {
        let keys = keys();
        let message = b"padding must be invisible";
        let mut padded = Vec::new();
        encrypt_records(&keys, Variant::AesGcm, 4096, 512, message, &mut padded).unwrap();
        let mut bare = Vec::new();
        encrypt_records(&keys, Variant::AesGcm, 4096, 0, message, &mut bare).unwrap();
        assert_eq!(padded.len(), bare.len() + 512);
        assert_eq!(
            decrypt_records(&keys, Variant::AesGcm, 4096, &padded).unwrap(),
            decrypt_records(&keys, Variant::AesGcm, 4096, &bare).unwrap()
        );
    }

    #[test]
    fn nonzero_pad_bytes_rejected() {
        let keys = keys();
        let cipher = record::cipher(&keys.key);
        // Forge a record whose pad field claims 4 octets but whose pad
        // bytes are not zero.
        let mut block = vec![0x00, 0x04];
        block.extend_from_slice(&[0, 0, 1, 0]);
        block.extend_from_slice(b"data");
        block[0] |= 0x80;
        let nonce = record::derive_nonce(&keys.nonce_base, 0);
        use aes_gcm::aead::Aead;
        let sealed = cipher
            .encrypt(aes_gcm::Nonce::from_slice(&nonce), block.as_slice())
            .unwrap();
        assert!(matches!(
            decrypt_records(&keys, Variant::Aes128Gcm, 4096, &sealed),
            Err(EceError::InvalidPadding)
        ));
    }

    #[test]
    fn pad_length_overflowing_the_record_rejected() {
        let keys = keys();
        let cipher = record::cipher(&keys.key);
        let block = vec![0x80 | 0x7f, 0xff]; // pad claims 32767, record is empty
        let nonce = record::derive_nonce(&keys.nonce_base, 0);
        use aes_gcm::aead::Aead;
        let sealed = cipher
            .encrypt(aes_gcm::Nonce::from_slice(&nonce), block.as_slice())
            .unwrap();
        assert!(matches!(
            decrypt_records(&keys, Variant::Aes128Gcm, 4096, &sealed),
            Err(EceError::InvalidPadding)
        ));
    }
}
