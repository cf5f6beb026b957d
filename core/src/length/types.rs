//! length/types.rs
//! Length prefix value type and errors.

use thiserror::Error;

use crate::constants::{LONG_LEN_WIDTH, MAX_LEN, SHORT_LEN_MAX, SHORT_LEN_WIDTH};

/// An encoded length prefix, 4 or 8 bytes, kept on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LenPrefix {
    buf: [u8; LONG_LEN_WIDTH],
    len: usize,
}

impl LenPrefix {
    pub(crate) fn new(buf: [u8; LONG_LEN_WIDTH], len: usize) -> Self {
        debug_assert!(len == SHORT_LEN_WIDTH || len == LONG_LEN_WIDTH);
        Self { buf, len }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a prefix is never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl AsRef<[u8]> for LenPrefix {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Width in bytes of the prefix that encodes `n`.
///
/// Returns `None` when `n` is beyond the representable range.
#[inline]
pub const fn len_width(n: u64) -> Option<usize> {
    if n <= SHORT_LEN_MAX {
        Some(SHORT_LEN_WIDTH)
    } else if n <= MAX_LEN {
        Some(LONG_LEN_WIDTH)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LengthError {
    /// Value cannot be represented by a 63-bit prefix.
    #[error("length too long: {have} > {max}")]
    TooLong { have: u64, max: u64 },

    /// Fewer bytes remain than the prefix requires.
    #[error("malformed length prefix at offset {offset}: need {need} bytes, have {have}")]
    Malformed { offset: usize, need: usize, have: usize },
}
