//! Schema mini-language.
//!
//! Responsibilities:
//! - Parse schema text into an ordered, immutable field list
//! - Carry the byte order selected by the leading marker
//! - Describe fields for humans (ids, notes, wire tokens)
//!
//! Non-responsibilities:
//! - Packing plans (see `plan`)
//! - Row values

pub mod types;
pub mod parse;

pub use types::{
    ByteOrder,
    Count,
    Field,
    FieldSpec,
    ListFieldSpec,
    ScalarType,
    Schema,
    SchemaError,
    Width,
};
