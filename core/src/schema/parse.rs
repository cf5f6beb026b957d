//! schema/parse.rs
//!
//! Schema text parser.
//!
//! Design notes:
//! - Grammar: `[order] field*` where a field is
//!   `[(count|~)? ':'] [digits|~] type ['(' id note ')']`.
//! - Field tokens are matched left to right and folded into an immutable list.
//! - Text between or after tokens must be whitespace unless
//!   `ParseOptions::allow_trailing` is set.

use std::str::FromStr;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::config::ParseOptions;
use crate::constants::{DEFAULT_ID_PREFIX, DYNAMIC_MARKER, MAX_LEN};
use crate::schema::types::{
    ByteOrder, Count, Field, FieldSpec, ListFieldSpec, ScalarType, Schema, SchemaError, Width,
};

lazy_static! {
    static ref FIELD_RE: Regex = Regex::new(
        r"(?x)
        (?P<list>(?P<count>\d+|~)?:)?
        (?P<len>\d+|~)?
        (?P<typ>[a-zA-Z?])
        (?:
            \(
                (?P<id>[a-zA-Z_][a-zA-Z_0-9]*)
                (?P<note>[^)]*)
            \)
        )?"
    )
    .expect("field pattern is valid");
}

/// Fold accumulator: fields so far, the end of the last match and the
/// summed width of every fixed field.
#[derive(Default)]
struct Scan {
    fields: Vec<Field>,
    cursor: usize,
    fixed_total: usize,
}

impl Schema {
    /// Parse with strict defaults.
    pub fn parse(text: &str) -> Result<Schema, SchemaError> {
        Self::parse_with(text, &ParseOptions::default())
    }

    pub fn parse_with(text: &str, opts: &ParseOptions) -> Result<Schema, SchemaError> {
        let trimmed = text.trim_start();
        let lead = text.len() - trimmed.len();

        let (order, body, base) = match trimmed.chars().next() {
            Some(c) if c.is_ascii() => match ByteOrder::try_from(c as u8) {
                Ok(order) => (order, &trimmed[1..], lead + 1),
                Err(_) => (ByteOrder::default(), trimmed, lead),
            },
            _ => (ByteOrder::default(), trimmed, lead),
        };

        let scan = FIELD_RE
            .captures_iter(body)
            .try_fold(Scan::default(), |mut scan, caps| {
                let Some(whole) = caps.get(0) else {
                    return Ok(scan);
                };
                check_gap(body, scan.cursor, whole.start(), base, opts)?;

                let position = scan.fields.len() + 1;
                let field = build_field(position, &caps)?;
                if scan.fields.iter().any(|f| f.id() == field.id()) {
                    return Err(SchemaError::DuplicateId {
                        position,
                        id: field.id().to_string(),
                    });
                }
                scan.fixed_total = add_fixed_width(scan.fixed_total, &field, position)?;
                scan.fields.push(field);
                scan.cursor = whole.end();
                Ok(scan)
            })?;
        check_gap(body, scan.cursor, body.len(), base, opts)?;

        debug!(
            "[SCHEMA] parsed {} field(s), byte order {}",
            scan.fields.len(),
            order.name()
        );

        Ok(Schema {
            order,
            fields: scan.fields,
            text: text.to_string(),
        })
    }
}

impl FromStr for Schema {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Schema::parse(s)
    }
}

/// Reject (or drop) non-whitespace text in `body[from..to]`.
fn check_gap(
    body: &str,
    from: usize,
    to: usize,
    base: usize,
    opts: &ParseOptions,
) -> Result<(), SchemaError> {
    let gap = &body[from..to];
    let fragment = gap.trim();
    if fragment.is_empty() {
        return Ok(());
    }

    let offset = base + from + (gap.len() - gap.trim_start().len());
    if opts.allow_trailing {
        warn!("[SCHEMA] ignoring unmatched input at offset {}: {:?}", offset, fragment);
        return Ok(());
    }

    Err(SchemaError::UnexpectedInput {
        offset,
        fragment: fragment.to_string(),
    })
}

fn build_field(position: usize, caps: &Captures<'_>) -> Result<Field, SchemaError> {
    let type_char = caps
        .name("typ")
        .and_then(|m| m.as_str().chars().next())
        .unwrap_or('\0');
    let ty = ScalarType::from_type_char(type_char)
        .ok_or(SchemaError::UnknownType { position, type_char })?;

    let width = match caps.name("len").map(|m| m.as_str()) {
        None => Width::Fixed(ty.canonical_width()),
        Some(_) if !ty.is_string() => {
            return Err(SchemaError::UnexpectedLength { position, type_char });
        }
        Some(DYNAMIC_MARKER) => Width::Dynamic,
        Some(digits) => match parse_number(digits, position)? {
            0 => return Err(SchemaError::ZeroLength { position, type_char }),
            n => Width::Fixed(n),
        },
    };

    let id = caps
        .name("id")
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| format!("{}{}", DEFAULT_ID_PREFIX, position));
    let note = caps
        .name("note")
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let item = FieldSpec { ty, width, id, note };
    if caps.name("list").is_none() {
        return Ok(Field::Scalar(item));
    }

    let count = match caps.name("count").map(|m| m.as_str()) {
        None | Some(DYNAMIC_MARKER) => Count::Dynamic,
        Some(digits) => match parse_number(digits, position)? {
            0 => return Err(SchemaError::ZeroCount { position, type_char }),
            n => Count::Fixed(n),
        },
    };

    Ok(Field::List(ListFieldSpec { item, count }))
}

/// Add the byte width of a fixed field to `total`, bounded by the largest
/// record body. Every fixed run is a part of this total.
fn add_fixed_width(total: usize, field: &Field, position: usize) -> Result<usize, SchemaError> {
    let width = match field {
        Field::Scalar(spec) => match spec.width {
            Width::Fixed(n) => Some(n),
            Width::Dynamic => return Ok(total),
        },
        Field::List(list) => match (list.count, list.item.width) {
            (Count::Fixed(count), Width::Fixed(n)) => n.checked_mul(count),
            _ => return Ok(total),
        },
    };

    width
        .and_then(|w| total.checked_add(w))
        .filter(|sum| *sum as u64 <= MAX_LEN)
        .ok_or(SchemaError::WidthOverflow { position, max: MAX_LEN })
}

fn parse_number(digits: &str, position: usize) -> Result<usize, SchemaError> {
    digits.parse::<usize>().map_err(|_| SchemaError::NumberTooLarge {
        position,
        digits: digits.to_string(),
    })
}
