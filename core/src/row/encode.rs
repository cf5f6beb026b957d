//! row/encode.rs
//!
//! Row encoding.
//!
//! Design notes:
//! - A record is `[body len][segment 0][segment 1]...`.
//! - A fixed segment is written as one contiguous block sized from the plan.
//! - A dynamic segment writes each field with its own length/count prefixes.
//! - On any error the output buffer is restored to its length before the call.

use byteorder::{BigEndian, ByteOrder as Endian, LittleEndian};
use bytes::{BufMut, BytesMut};
use tracing::trace;

use crate::codec::Codec;
use crate::constants::{MAX_LEN, SHORT_LEN_WIDTH};
use crate::length::{encode_len, len_width, put_len, put_len_usize, LengthError};
use crate::plan::{FieldPlan, FixedRun, Segment, Shape};
use crate::row::types::Value;
use crate::schema::ScalarType;
use crate::types::{PackError, Result};

/// Append one length-prefixed record for `row` to `out`.
///
/// # Returns
/// - `Ok(n)` with the number of bytes appended (prefix included).
/// - `Err(PackError::FieldNumber)` if the row arity differs from the schema.
/// - Value errors (`TypeMismatch`, `OutOfRange`, `WidthExceeded`,
///   `CountMismatch`, `Length(TooLong)`) for the first offending field.
pub fn encode_row(codec: &Codec, row: &[Value], out: &mut BytesMut) -> Result<usize> {
    let schema = codec.schema();
    if row.len() != schema.len() {
        return Err(PackError::FieldNumber {
            expected: schema.len(),
            actual: row.len(),
        });
    }

    let start = out.len();
    let res = if schema.order().is_big_endian() {
        encode_record::<BigEndian>(codec.segments(), row, out)
    } else {
        encode_record::<LittleEndian>(codec.segments(), row, out)
    };

    match res {
        Ok(()) => {
            let written = out.len() - start;
            trace!("[ENCODE] record of {} bytes at offset {}", written, start);
            Ok(written)
        }
        Err(e) => {
            out.truncate(start);
            Err(e)
        }
    }
}

fn encode_record<E: Endian>(segments: &[Segment], row: &[Value], out: &mut BytesMut) -> Result<()> {
    let start = out.len();

    // Short-form placeholder; widened below only for bodies over 2 GiB.
    out.put_u32(0);

    for segment in segments {
        match segment {
            Segment::Fixed(run) => pack_fixed::<E>(run, row, out)?,
            Segment::Dynamic(run) => {
                for plan in &run.fields {
                    pack_dynamic::<E>(plan, &row[plan.index], out)?;
                }
            }
        }
    }

    let body_len = (out.len() - start - SHORT_LEN_WIDTH) as u64;
    let prefix = encode_len(body_len)?;
    if prefix.len() == SHORT_LEN_WIDTH {
        out[start..start + SHORT_LEN_WIDTH].copy_from_slice(prefix.as_bytes());
    } else {
        let body = out.split_off(start + SHORT_LEN_WIDTH);
        out.truncate(start);
        out.put_slice(prefix.as_bytes());
        out.unsplit(body);
    }
    Ok(())
}

fn pack_fixed<E: Endian>(run: &FixedRun, row: &[Value], out: &mut BytesMut) -> Result<()> {
    let start = grow(out, run.width)?;
    let block = &mut out[start..];

    let mut off = 0usize;
    for plan in &run.fields {
        let value = &row[plan.index];
        let width = match plan.shape {
            Shape::Scalar { ty, width } => {
                put_scalar::<E>(&mut block[off..off + width], ty, value, &plan.id)?;
                width
            }
            Shape::FixedList { ty, item_width, count } => {
                let items = list_items(value, &plan.id)?;
                check_count(items, count, &plan.id)?;
                let width = item_width * count;
                put_items::<E>(&mut block[off..off + width], ty, item_width, items, &plan.id)?;
                width
            }
            _ => return Err(misplaced(plan)),
        };
        off += width;
    }

    debug_assert_eq!(off, run.width, "fixed run wrote incorrect length");
    Ok(())
}

fn pack_dynamic<E: Endian>(plan: &FieldPlan, value: &Value, out: &mut BytesMut) -> Result<()> {
    let field = plan.id.as_str();
    match plan.shape {
        Shape::DynBytes => {
            let b = bytes(value, field)?;
            put_len_usize(out, b.len())?;
            out.put_slice(b);
        }
        Shape::FixedListOfDynBytes { count } => {
            let items = list_items(value, field)?;
            check_count(items, count, field)?;
            put_len(out, dyn_payload_len(items, field)?)?;
            put_dyn_items(items, field, out)?;
        }
        Shape::DynList { ty, item_width } => {
            let items = list_items(value, field)?;
            let width = items
                .len()
                .checked_mul(item_width)
                .ok_or(LengthError::TooLong { have: u64::MAX, max: MAX_LEN })?;
            put_len_usize(out, items.len())?;

            let start = grow(out, width)?;
            put_items::<E>(&mut out[start..], ty, item_width, items, field)?;
        }
        Shape::DynListOfDynBytes => {
            let items = list_items(value, field)?;
            put_len(out, dyn_payload_len(items, field)?)?;
            put_len_usize(out, items.len())?;
            put_dyn_items(items, field, out)?;
        }
        Shape::Scalar { .. } | Shape::FixedList { .. } => return Err(misplaced(plan)),
    }
    Ok(())
}

/// Append `width` zero bytes, returning where they start.
fn grow(out: &mut BytesMut, width: usize) -> Result<usize> {
    let start = out.len();
    let end = start
        .checked_add(width)
        .filter(|end| *end <= isize::MAX as usize)
        .ok_or(LengthError::TooLong { have: width as u64, max: MAX_LEN })?;
    out.resize(end, 0);
    Ok(start)
}

/// Bytes taken by `items` as individually length-prefixed strings.
fn dyn_payload_len(items: &[Value], field: &str) -> Result<u64> {
    items
        .iter()
        .map(|item| -> Result<u64> {
            let n = bytes(item, field)?.len() as u64;
            let w = len_width(n).ok_or(LengthError::TooLong { have: n, max: MAX_LEN })?;
            Ok(w as u64 + n)
        })
        .sum()
}

fn put_dyn_items(items: &[Value], field: &str, out: &mut BytesMut) -> Result<()> {
    for item in items {
        let b = bytes(item, field)?;
        put_len_usize(out, b.len())?;
        out.put_slice(b);
    }
    Ok(())
}

fn put_items<E: Endian>(
    block: &mut [u8],
    ty: ScalarType,
    item_width: usize,
    items: &[Value],
    field: &str,
) -> Result<()> {
    for (slot, item) in block.chunks_exact_mut(item_width).zip(items) {
        put_scalar::<E>(slot, ty, item, field)?;
    }
    Ok(())
}

/// Write one value into a zeroed slot of exactly its field width.
fn put_scalar<E: Endian>(slot: &mut [u8], ty: ScalarType, value: &Value, field: &str) -> Result<()> {
    use ScalarType::*;
    match ty {
        Pad => match value {
            Value::Pad => {}
            other => return Err(mismatch(field, "pad", other)),
        },
        Bool => slot[0] = boolean(value, field)? as u8,
        Int8 => slot[0] = signed(value, field, ty, i8::MIN as i64, i8::MAX as i64)? as i8 as u8,
        UInt8 => slot[0] = unsigned(value, field, ty, u8::MAX as u64)? as u8,
        Int16 => E::write_i16(slot, signed(value, field, ty, i16::MIN as i64, i16::MAX as i64)? as i16),
        UInt16 => E::write_u16(slot, unsigned(value, field, ty, u16::MAX as u64)? as u16),
        Int32 => E::write_i32(slot, signed(value, field, ty, i32::MIN as i64, i32::MAX as i64)? as i32),
        UInt32 => E::write_u32(slot, unsigned(value, field, ty, u32::MAX as u64)? as u32),
        Int64 => E::write_i64(slot, signed(value, field, ty, i64::MIN, i64::MAX)?),
        UInt64 => E::write_u64(slot, unsigned(value, field, ty, u64::MAX)?),
        Float32 => {
            let v = float(value, field)?;
            let narrow = v as f32;
            if v.is_finite() && narrow.is_infinite() {
                return Err(out_of_range(field, ty, value));
            }
            E::write_f32(slot, narrow)
        }
        Float64 => E::write_f64(slot, float(value, field)?),
        Bytes => {
            let b = bytes(value, field)?;
            if b.len() > slot.len() {
                return Err(PackError::WidthExceeded {
                    field: field.to_string(),
                    width: slot.len(),
                    actual: b.len(),
                });
            }
            // shorter strings keep the zeroed tail
            slot[..b.len()].copy_from_slice(b);
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Value coercions
// -----------------------------------------------------------------------------

fn mismatch(field: &str, expected: &'static str, found: &Value) -> PackError {
    PackError::TypeMismatch {
        field: field.to_string(),
        expected,
        found: found.kind(),
    }
}

fn out_of_range(field: &str, ty: ScalarType, value: &Value) -> PackError {
    PackError::OutOfRange {
        field: field.to_string(),
        ty: ty.name(),
        value: value.to_string(),
    }
}

fn misplaced(plan: &FieldPlan) -> PackError {
    PackError::Malformed(format!(
        "field {}: {} shape in the wrong segment class",
        plan.id,
        plan.shape.name()
    ))
}

fn signed(value: &Value, field: &str, ty: ScalarType, min: i64, max: i64) -> Result<i64> {
    let v = match *value {
        Value::Int(v) => v,
        Value::UInt(v) => i64::try_from(v).map_err(|_| out_of_range(field, ty, value))?,
        _ => return Err(mismatch(field, "int", value)),
    };
    if v < min || v > max {
        return Err(out_of_range(field, ty, value));
    }
    Ok(v)
}

fn unsigned(value: &Value, field: &str, ty: ScalarType, max: u64) -> Result<u64> {
    let v = match *value {
        Value::UInt(v) => v,
        Value::Int(v) => u64::try_from(v).map_err(|_| out_of_range(field, ty, value))?,
        _ => return Err(mismatch(field, "uint", value)),
    };
    if v > max {
        return Err(out_of_range(field, ty, value));
    }
    Ok(v)
}

fn float(value: &Value, field: &str) -> Result<f64> {
    match *value {
        Value::F32(v) => Ok(v as f64),
        Value::F64(v) => Ok(v),
        Value::Int(v) => Ok(v as f64),
        Value::UInt(v) => Ok(v as f64),
        _ => Err(mismatch(field, "float", value)),
    }
}

fn boolean(value: &Value, field: &str) -> Result<bool> {
    match *value {
        Value::Bool(v) => Ok(v),
        _ => Err(mismatch(field, "bool", value)),
    }
}

fn bytes<'v>(value: &'v Value, field: &str) -> Result<&'v [u8]> {
    match value {
        Value::Bytes(b) => Ok(b),
        other => Err(mismatch(field, "bytes", other)),
    }
}

fn list_items<'v>(value: &'v Value, field: &str) -> Result<&'v [Value]> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(mismatch(field, "list", other)),
    }
}

fn check_count(items: &[Value], count: usize, field: &str) -> Result<()> {
    if items.len() != count {
        return Err(PackError::CountMismatch {
            field: field.to_string(),
            expected: count,
            actual: items.len(),
        });
    }
    Ok(())
}
