//! constants.rs
//! Wire constants shared by the length codec, the schema parser and the row codec.

/// Largest value carried by the short (4-byte) length prefix.
pub const SHORT_LEN_MAX: u64 = 0x7FFF_FFFF;

/// Largest value representable by any length prefix (2^63 - 1).
pub const MAX_LEN: u64 = u64::MAX >> 1;

/// Escape bias for the long (8-byte) form; sets bit 31 of the first word.
pub const LONG_LEN_BIAS: u64 = 1 << 63;

/// Short prefix width in bytes.
pub const SHORT_LEN_WIDTH: usize = 4;
/// Long prefix width in bytes.
pub const LONG_LEN_WIDTH: usize = 8;

/// Prefix for generated field ids (`f1`, `f2`, ...).
pub const DEFAULT_ID_PREFIX: &str = "f";

/// Marker for a dynamic length or count in the schema language.
pub const DYNAMIC_MARKER: &str = "~";

/// Default packer buffer capacity.
pub const DEFAULT_PACK_CAPACITY: usize = 4 * 1024;

/// Type characters, mirrored by `schema::ScalarType`.
pub mod type_chars {
    pub const PAD: u8     = b'x';
    pub const INT8: u8    = b'b';
    pub const UINT8: u8   = b'B';
    pub const BOOL: u8    = b'?';
    pub const INT16: u8   = b'h';
    pub const UINT16: u8  = b'H';
    pub const INT32: u8   = b'i';
    pub const UINT32: u8  = b'I';
    pub const INT64: u8   = b'q';
    pub const UINT64: u8  = b'Q';
    pub const FLOAT32: u8 = b'f';
    pub const FLOAT64: u8 = b'd';
    pub const BYTES: u8   = b's';

    /// Aliases accepted on input and normalized on output.
    pub const INT32_ALT: u8  = b'l';
    pub const UINT32_ALT: u8 = b'L';
    pub const BYTES_ALT: &[u8] = b"Sp";
}
