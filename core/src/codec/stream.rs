//! codec/stream.rs
//!
//! Whole-buffer helpers and the optional schema block.
//!
//! Schema block layout:
//! ```text
//! [len prefix][schema text, UTF-8][record][record]...
//! ```
//! The prefix uses the same 4/8-byte big-endian form as record prefixes.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::codec::Codec;
use crate::length::{decode_len, put_len_usize};
use crate::row::{Row, Value};
use crate::schema::Schema;
use crate::types::{PackError, Result};

/// Append the schema block for `schema` to `out`.
///
/// # Returns
/// - `Ok(n)` with the bytes appended (prefix included).
pub fn write_schema_block(schema: &Schema, out: &mut BytesMut) -> Result<usize> {
    let text = schema.text().as_bytes();
    let prefix = put_len_usize(out, text.len())?;
    out.put_slice(text);
    Ok(prefix + text.len())
}

/// Read a schema block at the start of `buf` and compile it.
///
/// # Returns
/// - `Ok((codec, n))` where `n` is the offset of the first record.
/// - `Err(PackError::Malformed)` if the text is not UTF-8.
/// - `Err(PackError::Schema)` if the text does not parse.
pub fn read_schema_block(buf: &[u8]) -> Result<(Codec, usize)> {
    let (width, n) = decode_len(buf, 0)?;
    let n = usize::try_from(n)
        .map_err(|_| PackError::Malformed(format!("schema block of {} bytes", n)))?;

    let end = width.checked_add(n).filter(|end| *end <= buf.len()).ok_or(PackError::Truncated {
        offset: width,
        need: n,
        have: buf.len() - width,
    })?;

    let text = std::str::from_utf8(&buf[width..end])
        .map_err(|e| PackError::Malformed(format!("schema block is not UTF-8: {}", e)))?;
    let codec = Codec::new(text)?;

    debug!("[STREAM] schema block {:?} ({} bytes)", text, end);
    Ok((codec, end))
}

/// Decode a buffer written by `Packer::with_schema_block`.
pub fn loads_self_described(buf: &[u8]) -> Result<(Codec, Vec<Row>)> {
    let (codec, start) = read_schema_block(buf)?;
    let rows = codec.decode_from(buf, start).collect::<Result<Vec<_>>>()?;
    Ok((codec, rows))
}

/// Pack `rows` with a one-off codec for `schema`.
pub fn dumps<R: AsRef<[Value]>>(schema: &str, rows: &[R]) -> Result<Bytes> {
    let mut packer = Codec::new(schema)?.packer();
    packer.add_rows(rows)?;
    Ok(packer.into_bytes())
}

/// Unpack every record of `data` with a one-off codec for `schema`.
pub fn loads(schema: &str, data: &[u8]) -> Result<Vec<Row>> {
    let codec = Codec::new(schema)?;
    let rows = codec.decode_all(data).collect::<Result<Vec<_>>>()?;
    Ok(rows)
}
