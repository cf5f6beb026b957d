//! utils.rs
//! Formatting helpers shared by `Display` impls and error messages.

/// Printable ASCII as `b"..."`, anything else as `0x<hex>`.
pub fn fmt_bytes(b: &[u8]) -> String {
    if b.iter().all(|&c| c.is_ascii_graphic() || c == b' ') {
        format!("b\"{}\"", String::from_utf8_lossy(b))
    } else {
        format!("0x{}", hex::encode(b))
    }
}
