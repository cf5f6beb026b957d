//! length/encode.rs
//!
//! Length prefix encoding.
//!
//! Design notes:
//! - Values up to `0x7FFF_FFFF` use a 4-byte big-endian word.
//! - Larger values use an 8-byte big-endian word biased by 2^63, so the
//!   first 4 bytes always carry the escape bit.
//! - Prefixes are big-endian regardless of the schema byte order.

use byteorder::{BigEndian, ByteOrder};
use bytes::BufMut;

use crate::constants::{LONG_LEN_BIAS, LONG_LEN_WIDTH, MAX_LEN, SHORT_LEN_MAX, SHORT_LEN_WIDTH};
use crate::length::types::{LenPrefix, LengthError};

/// Encode `n` into a 4- or 8-byte prefix.
///
/// # Returns
/// - `Ok(LenPrefix)` holding the wire bytes.
/// - `Err(LengthError::TooLong)` if `n > 2^63 - 1`.
#[inline]
pub fn encode_len(n: u64) -> Result<LenPrefix, LengthError> {
    let mut buf = [0u8; LONG_LEN_WIDTH];

    if n <= SHORT_LEN_MAX {
        BigEndian::write_u32(&mut buf[..SHORT_LEN_WIDTH], n as u32);
        return Ok(LenPrefix::new(buf, SHORT_LEN_WIDTH));
    }

    if n > MAX_LEN {
        return Err(LengthError::TooLong { have: n, max: MAX_LEN });
    }

    BigEndian::write_u64(&mut buf, n | LONG_LEN_BIAS);
    Ok(LenPrefix::new(buf, LONG_LEN_WIDTH))
}

/// Append the prefix for `n` to `out`, returning the number of bytes written.
#[inline]
pub fn put_len<B: BufMut>(out: &mut B, n: u64) -> Result<usize, LengthError> {
    let prefix = encode_len(n)?;
    out.put_slice(prefix.as_bytes());
    Ok(prefix.len())
}

/// `usize` convenience for byte counts and list lengths.
#[inline]
pub fn put_len_usize<B: BufMut>(out: &mut B, n: usize) -> Result<usize, LengthError> {
    // usize never exceeds u64 on supported targets
    put_len(out, n as u64)
}
