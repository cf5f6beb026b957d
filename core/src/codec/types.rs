//! codec/types.rs
//! Shared, immutable codec: one schema plus its compiled plan.

use std::sync::Arc;

use bytes::{Bytes, BytesMut};

use crate::config::{PackConfig, ParseOptions};
use crate::plan::{compile, Segment};
use crate::row::{decode_next, encode_row, Row, Value};
use crate::schema::{ScalarType, Schema};
use crate::types::{PackError, Result};

use super::pack::Packer;
use super::rows::Rows;

#[derive(Debug)]
struct CodecInner {
    schema: Schema,
    segments: Vec<Segment>,
}

/// Schema and plan, compiled once and shared read-only.
///
/// Cloning is cheap; clones share the same plan. Every packer or reader
/// built from a codec owns its own buffer or cursor.
#[derive(Debug, Clone)]
pub struct Codec {
    inner: Arc<CodecInner>,
}

impl Codec {
    /// Parse `schema` text and compile its plan.
    pub fn new(schema: &str) -> Result<Self> {
        Self::with_options(schema, &ParseOptions::default())
    }

    pub fn with_options(schema: &str, opts: &ParseOptions) -> Result<Self> {
        Ok(Self::from_schema(Schema::parse_with(schema, opts)?))
    }

    pub fn from_schema(schema: Schema) -> Self {
        let segments = compile(&schema);
        Self {
            inner: Arc::new(CodecInner { schema, segments }),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.inner.schema
    }

    pub fn segments(&self) -> &[Segment] {
        &self.inner.segments
    }

    /// Encode a single record into a fresh buffer.
    pub fn encode(&self, row: &[Value]) -> Result<Bytes> {
        let mut out = BytesMut::new();
        encode_row(self, row, &mut out)?;
        Ok(out.freeze())
    }

    /// Append a single record to `out`.
    pub fn encode_into(&self, row: &[Value], out: &mut BytesMut) -> Result<usize> {
        encode_row(self, row, out)
    }

    pub fn decode_next(&self, buf: &[u8], cursor: usize) -> Result<Option<(Row, usize)>> {
        decode_next(self, buf, cursor)
    }

    /// Lazy iterator over every record in `buf`.
    pub fn decode_all<'a>(&'a self, buf: &'a [u8]) -> Rows<'a> {
        Rows::new(self, buf, 0)
    }

    /// Lazy iterator over the records of `buf` starting at `cursor`.
    pub fn decode_from<'a>(&'a self, buf: &'a [u8], cursor: usize) -> Rows<'a> {
        Rows::new(self, buf, cursor)
    }

    pub fn packer(&self) -> Packer {
        Packer::new(self.clone())
    }

    pub fn packer_with(&self, config: PackConfig) -> Packer {
        Packer::with_config(self.clone(), config)
    }

    /// Pair each value with its field id.
    pub fn named<'r>(&self, row: &'r [Value]) -> Vec<(&str, &'r Value)> {
        self.schema().field_ids().zip(row.iter()).collect()
    }

    /// Reorder a keyword row into schema order.
    ///
    /// Pad fields are filled automatically and may be omitted.
    pub fn row_from_named<K: AsRef<str>>(&self, named: &[(K, Value)]) -> Result<Row> {
        if let Some((key, _)) = named
            .iter()
            .find(|(key, _)| self.schema().position(key.as_ref()).is_none())
        {
            return Err(PackError::UnknownField(key.as_ref().to_string()));
        }

        self.schema()
            .fields()
            .iter()
            .map(|field| {
                match named.iter().find(|(key, _)| key.as_ref() == field.id()) {
                    Some((_, value)) => Ok(value.clone()),
                    None if !field.is_list() && field.scalar_type() == ScalarType::Pad => Ok(Value::Pad),
                    None => Err(PackError::MissingField(field.id().to_string())),
                }
            })
            .collect()
    }
}
