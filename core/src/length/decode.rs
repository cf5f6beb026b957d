//! length/decode.rs
//!
//! Length prefix decoding.
//!
//! Design notes:
//! - Reads a 4-byte head first; bit 31 selects the 8-byte form.
//! - The 8-byte form is re-read from the same offset and un-biased.
//! - Never reads past the end of `buf`.

use byteorder::{BigEndian, ByteOrder};

use crate::constants::{LONG_LEN_BIAS, LONG_LEN_WIDTH, SHORT_LEN_WIDTH};
use crate::length::types::LengthError;

/// Decode a prefix starting at `offset`.
///
/// # Returns
/// - `Ok((width, value))` where `width` is 4 or 8.
/// - `Err(LengthError::Malformed)` if fewer bytes remain than the prefix needs.
#[inline]
pub fn decode_len(buf: &[u8], offset: usize) -> Result<(usize, u64), LengthError> {
    let have = buf.len().saturating_sub(offset);
    if have < SHORT_LEN_WIDTH {
        return Err(LengthError::Malformed { offset, need: SHORT_LEN_WIDTH, have });
    }

    let head = BigEndian::read_u32(&buf[offset..offset + SHORT_LEN_WIDTH]);
    if head >> 31 == 0 {
        return Ok((SHORT_LEN_WIDTH, head as u64));
    }

    if have < LONG_LEN_WIDTH {
        return Err(LengthError::Malformed { offset, need: LONG_LEN_WIDTH, have });
    }

    let v = BigEndian::read_u64(&buf[offset..offset + LONG_LEN_WIDTH]);
    Ok((LONG_LEN_WIDTH, v - LONG_LEN_BIAS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::length::encode::encode_len;

    #[test]
    fn reads_at_offset() {
        let mut buf = vec![0xAA, 0xBB];
        buf.extend_from_slice(encode_len(7).unwrap().as_bytes());
        assert_eq!(decode_len(&buf, 2).unwrap(), (4, 7));
    }

    #[test]
    fn offset_past_end_is_malformed() {
        assert!(matches!(
            decode_len(&[0, 0], 5),
            Err(LengthError::Malformed { have: 0, .. })
        ));
    }
}
