//! row/decode.rs
//!
//! Row decoding, the inverse of `encode.rs`.
//!
//! Design notes:
//! - The outer prefix bounds the record; nothing past it is read.
//! - A fixed segment is bounds-checked once for its whole width.
//! - Nested payloads (list of dynamic strings) must be consumed exactly.
//! - Errors carry absolute offsets into the caller's buffer.
//! - No partial row is ever returned.

use byteorder::{BigEndian, ByteOrder as Endian, LittleEndian};
use tracing::trace;

use crate::codec::Codec;
use crate::length::{decode_len, LengthError};
use crate::plan::{FieldPlan, Segment, Shape};
use crate::row::types::{Row, Value};
use crate::schema::ScalarType;
use crate::types::{PackError, Result};

/// Bounded cursor over a slice of the caller's buffer.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    /// Absolute offset of `buf[0]`, for error reporting.
    base: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8], pos: usize, base: usize) -> Self {
        Self { buf, pos, base }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn offset(&self) -> usize {
        self.base + self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(PackError::Truncated {
                offset: self.offset(),
                need: n,
                have: self.remaining(),
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    /// Read a length/count prefix.
    fn len(&mut self) -> Result<usize> {
        let (width, n) = decode_len(self.buf, self.pos).map_err(|e| match e {
            LengthError::Malformed { offset, need, have } => LengthError::Malformed {
                offset: offset + self.base,
                need,
                have,
            },
            other => other,
        })?;
        self.pos += width;
        usize::try_from(n)
            .map_err(|_| PackError::Malformed(format!("length {} exceeds address space", n)))
    }

    /// Split off the next `n` bytes as their own reader.
    fn sub(&mut self, n: usize) -> Result<Reader<'a>> {
        let base = self.offset();
        let buf = self.take(n)?;
        Ok(Reader::new(buf, 0, base))
    }
}

/// Decode the record starting at `cursor`.
///
/// # Returns
/// - `Ok(None)` when `cursor` is at (or past) the end of `buf`.
/// - `Ok(Some((row, next)))` with the cursor of the following record.
/// - `Err(..)` if the record is truncated, malformed or has trailing bytes.
pub fn decode_next(codec: &Codec, buf: &[u8], cursor: usize) -> Result<Option<(Row, usize)>> {
    if cursor >= buf.len() {
        return Ok(None);
    }

    let mut outer = Reader::new(buf, cursor, 0);
    let body_len = outer.len()?;
    let mut body = outer.sub(body_len)?;

    let row = if codec.schema().order().is_big_endian() {
        decode_body::<BigEndian>(codec.segments(), codec.schema().len(), &mut body)?
    } else {
        decode_body::<LittleEndian>(codec.segments(), codec.schema().len(), &mut body)?
    };

    if body.remaining() != 0 {
        return Err(PackError::TrailingBytes {
            offset: body.offset(),
            remaining: body.remaining(),
        });
    }

    trace!("[DECODE] record of {} bytes at offset {}", outer.pos - cursor, cursor);
    Ok(Some((row, outer.pos)))
}

fn decode_body<E: Endian>(segments: &[Segment], arity: usize, reader: &mut Reader<'_>) -> Result<Row> {
    let mut row = Vec::with_capacity(arity);

    for segment in segments {
        match segment {
            Segment::Fixed(run) => {
                let block = reader.take(run.width)?;
                let mut off = 0usize;
                for plan in &run.fields {
                    let (value, width) = match plan.shape {
                        Shape::Scalar { ty, width } => {
                            (get_scalar::<E>(ty, &block[off..off + width]), width)
                        }
                        Shape::FixedList { ty, item_width, count } => {
                            let width = item_width * count;
                            let items = get_items::<E>(ty, item_width, &block[off..off + width]);
                            (Value::List(items), width)
                        }
                        _ => return Err(misplaced(plan)),
                    };
                    row.push(value);
                    off += width;
                }
            }
            Segment::Dynamic(run) => {
                for plan in &run.fields {
                    row.push(unpack_dynamic::<E>(plan, reader)?);
                }
            }
        }
    }

    Ok(row)
}

fn unpack_dynamic<E: Endian>(plan: &FieldPlan, reader: &mut Reader<'_>) -> Result<Value> {
    match plan.shape {
        Shape::DynBytes => {
            let n = reader.len()?;
            Ok(Value::Bytes(reader.take(n)?.to_vec()))
        }
        Shape::FixedListOfDynBytes { count } => {
            let n = reader.len()?;
            let mut payload = reader.sub(n)?;
            Ok(Value::List(get_dyn_items(&mut payload, count, &plan.id)?))
        }
        Shape::DynList { ty, item_width } => {
            let count = reader.len()?;
            let width = count.checked_mul(item_width).ok_or_else(|| {
                PackError::Malformed(format!("field {}: list of {} items overflows", plan.id, count))
            })?;
            let block = reader.take(width)?;
            Ok(Value::List(get_items::<E>(ty, item_width, block)))
        }
        Shape::DynListOfDynBytes => {
            let n = reader.len()?;
            let count = reader.len()?;
            let mut payload = reader.sub(n)?;
            Ok(Value::List(get_dyn_items(&mut payload, count, &plan.id)?))
        }
        Shape::Scalar { .. } | Shape::FixedList { .. } => Err(misplaced(plan)),
    }
}

/// Read exactly `count` length-prefixed strings filling `payload`.
fn get_dyn_items(payload: &mut Reader<'_>, count: usize, field: &str) -> Result<Vec<Value>> {
    // every item costs at least one short prefix
    let mut items = Vec::with_capacity(count.min(payload.remaining() / 4));
    for _ in 0..count {
        let n = payload.len()?;
        items.push(Value::Bytes(payload.take(n)?.to_vec()));
    }

    if payload.remaining() != 0 {
        return Err(PackError::Malformed(format!(
            "field {}: {} unused byte(s) in list payload",
            field,
            payload.remaining()
        )));
    }
    Ok(items)
}

fn get_items<E: Endian>(ty: ScalarType, item_width: usize, block: &[u8]) -> Vec<Value> {
    block
        .chunks_exact(item_width)
        .map(|chunk| get_scalar::<E>(ty, chunk))
        .collect()
}

fn get_scalar<E: Endian>(ty: ScalarType, b: &[u8]) -> Value {
    use ScalarType::*;
    match ty {
        Pad     => Value::Pad,
        Bool    => Value::Bool(b[0] != 0),
        Int8    => Value::Int(b[0] as i8 as i64),
        UInt8   => Value::UInt(b[0] as u64),
        Int16   => Value::Int(E::read_i16(b) as i64),
        UInt16  => Value::UInt(E::read_u16(b) as u64),
        Int32   => Value::Int(E::read_i32(b) as i64),
        UInt32  => Value::UInt(E::read_u32(b) as u64),
        Int64   => Value::Int(E::read_i64(b)),
        UInt64  => Value::UInt(E::read_u64(b)),
        Float32 => Value::F32(E::read_f32(b)),
        Float64 => Value::F64(E::read_f64(b)),
        Bytes   => Value::Bytes(b.to_vec()),
    }
}

fn misplaced(plan: &FieldPlan) -> PackError {
    PackError::Malformed(format!(
        "field {}: {} shape in the wrong segment class",
        plan.id,
        plan.shape.name()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::LONG_LEN_WIDTH;

    #[test]
    fn reader_reports_absolute_offsets() {
        let buf = [0u8; 10];
        let mut outer = Reader::new(&buf, 2, 0);
        let mut sub = outer.sub(4).unwrap();
        match sub.take(LONG_LEN_WIDTH) {
            Err(PackError::Truncated { offset, need, have }) => {
                assert_eq!((offset, need, have), (2, 8, 4));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
