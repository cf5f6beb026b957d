use thiserror::Error;

use crate::length::LengthError;
use crate::schema::SchemaError;

/// Unified codec error covering schema, length prefix, row and record failures.
/// - `From<T>` impls enable `?` across layers.
/// - Field-level variants carry the field id for logs.
#[derive(Debug, Error)]
pub enum PackError {
    /// Schema text rejected by the parser.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Length prefix out of range (encode) or cut short (decode).
    #[error("length error: {0}")]
    Length(#[from] LengthError),

    /// Row arity differs from schema arity.
    #[error("field number mismatch: expected {expected}, got {actual}")]
    FieldNumber { expected: usize, actual: usize },

    /// Value variant not accepted by the field type.
    #[error("field {field}: expected {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Integer does not fit the declared width.
    #[error("field {field}: value {value} out of range for {ty}")]
    OutOfRange {
        field: String,
        ty: &'static str,
        value: String,
    },

    /// Byte string longer than a fixed string width.
    #[error("field {field}: {actual} bytes exceed fixed width {width}")]
    WidthExceeded {
        field: String,
        width: usize,
        actual: usize,
    },

    /// Fixed list with the wrong number of items.
    #[error("field {field}: expected {expected} items, got {actual}")]
    CountMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// Named row lacks a schema field.
    #[error("missing field: {0}")]
    MissingField(String),

    /// Named row carries an id the schema does not know.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Fewer bytes remain than a declared length or fixed run needs.
    #[error("truncated record at offset {offset}: need {need} bytes, have {have}")]
    Truncated { offset: usize, need: usize, have: usize },

    /// Record body not consumed exactly by the schema.
    #[error("{remaining} trailing byte(s) after record body at offset {offset}")]
    TrailingBytes { offset: usize, remaining: usize },

    /// Inconsistent nested lengths or counts.
    #[error("malformed record: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, PackError>;

impl PackError {
    /// True for failures that stop decoding at the current record.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            PackError::Truncated { .. }
                | PackError::TrailingBytes { .. }
                | PackError::Malformed(_)
                | PackError::Length(LengthError::Malformed { .. })
        )
    }
}
