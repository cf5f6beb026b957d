//! Variable-width length prefixes.
//!
//! Responsibilities:
//! - Encode byte counts and item counts as 4- or 8-byte big-endian words
//! - Decode them with bounds checks
//!
//! Non-responsibilities:
//! - Knowing what the length describes
//! - Schema byte order (prefixes are always big-endian)

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{len_width, LenPrefix, LengthError};
pub use encode::{encode_len, put_len, put_len_usize};
pub use decode::decode_len;
