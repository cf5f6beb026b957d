//! schema/types.rs
//! Field model for the schema mini-language.
//!
//! Notes:
//! - `ScalarType` and `ByteOrder` are registries keyed by their schema character,
//!   in the same way wire enums are keyed by their numeric id.
//! - Only string-category types carry a declared width; every other type
//!   has a width fixed by its type.
//! - A `Schema` is immutable once parsed.

use std::fmt;
use num_enum::TryFromPrimitive;
use thiserror::Error;

use crate::constants::type_chars;

/// Byte order of fixed-width values, selected by the leading schema character.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, TryFromPrimitive)]
pub enum ByteOrder {
    Native  = b'=',
    Little  = b'<',
    Big     = b'>',
    #[default]
    Network = b'!',
}

impl ByteOrder {
    pub fn marker(self) -> char {
        self as u8 as char
    }

    /// True when fixed values are written most significant byte first.
    pub fn is_big_endian(self) -> bool {
        match self {
            ByteOrder::Big | ByteOrder::Network => true,
            ByteOrder::Little => false,
            ByteOrder::Native => cfg!(target_endian = "big"),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ByteOrder::Native  => "native",
            ByteOrder::Little  => "little-endian",
            ByteOrder::Big     => "big-endian",
            ByteOrder::Network => "network",
        }
    }
}

/// Closed scalar alphabet.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum ScalarType {
    Pad     = type_chars::PAD,
    Int8    = type_chars::INT8,
    UInt8   = type_chars::UINT8,
    Bool    = type_chars::BOOL,
    Int16   = type_chars::INT16,
    UInt16  = type_chars::UINT16,
    Int32   = type_chars::INT32,
    UInt32  = type_chars::UINT32,
    Int64   = type_chars::INT64,
    UInt64  = type_chars::UINT64,
    Float32 = type_chars::FLOAT32,
    Float64 = type_chars::FLOAT64,
    Bytes   = type_chars::BYTES,
}

impl ScalarType {
    /// Resolve a schema type character, folding aliases.
    pub fn from_type_char(c: char) -> Option<Self> {
        if !c.is_ascii() {
            return None;
        }
        let canonical = match c as u8 {
            type_chars::INT32_ALT => type_chars::INT32,
            type_chars::UINT32_ALT => type_chars::UINT32,
            b if type_chars::BYTES_ALT.contains(&b) => type_chars::BYTES,
            b => b,
        };
        Self::try_from_primitive(canonical).ok()
    }

    pub fn type_char(self) -> char {
        self as u8 as char
    }

    /// String-category types may declare a width.
    pub fn is_string(self) -> bool {
        matches!(self, ScalarType::Bytes)
    }

    /// Canonical width in bytes. Strings report their default width of 1.
    pub fn canonical_width(self) -> usize {
        use ScalarType::*;
        match self {
            Pad | Int8 | UInt8 | Bool | Bytes => 1,
            Int16 | UInt16 => 2,
            Int32 | UInt32 | Float32 => 4,
            Int64 | UInt64 | Float64 => 8,
        }
    }

    pub fn name(self) -> &'static str {
        use ScalarType::*;
        match self {
            Pad     => "pad",
            Int8    => "int8",
            UInt8   => "uint8",
            Bool    => "bool",
            Int16   => "int16",
            UInt16  => "uint16",
            Int32   => "int32",
            UInt32  => "uint32",
            Int64   => "int64",
            UInt64  => "uint64",
            Float32 => "float32",
            Float64 => "float64",
            Bytes   => "bytes",
        }
    }
}

/// Byte width of a scalar field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Width {
    Fixed(usize),
    Dynamic,
}

/// Repetition of a list field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Count {
    Fixed(usize),
    Dynamic,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub ty: ScalarType,
    pub width: Width,
    pub id: String,
    /// Free text; documentation only.
    pub note: Option<String>,
}

impl FieldSpec {
    pub fn is_fixed(&self) -> bool {
        matches!(self.width, Width::Fixed(_))
    }

    pub fn fixed_width(&self) -> Option<usize> {
        match self.width {
            Width::Fixed(n) => Some(n),
            Width::Dynamic => None,
        }
    }

    /// Token as written in the schema language, e.g. `H`, `3s`, `~s`.
    pub fn token(&self) -> String {
        match (self.ty.is_string(), self.width) {
            (true, Width::Fixed(1)) => self.ty.type_char().to_string(),
            (true, Width::Fixed(n)) => format!("{}{}", n, self.ty.type_char()),
            (_, Width::Dynamic) => format!("~{}", self.ty.type_char()),
            (false, Width::Fixed(_)) => self.ty.type_char().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListFieldSpec {
    pub item: FieldSpec,
    pub count: Count,
}

impl ListFieldSpec {
    /// Own fixedness: the count, independent of the item.
    pub fn is_fixed(&self) -> bool {
        matches!(self.count, Count::Fixed(_))
    }

    pub fn token(&self) -> String {
        match self.count {
            Count::Fixed(n) => format!("{}:{}", n, self.item.token()),
            Count::Dynamic => format!("~:{}", self.item.token()),
        }
    }
}

/// One schema position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Field {
    Scalar(FieldSpec),
    List(ListFieldSpec),
}

impl Field {
    fn spec(&self) -> &FieldSpec {
        match self {
            Field::Scalar(spec) => spec,
            Field::List(list) => &list.item,
        }
    }

    pub fn id(&self) -> &str {
        &self.spec().id
    }

    pub fn note(&self) -> Option<&str> {
        self.spec().note.as_deref()
    }

    pub fn scalar_type(&self) -> ScalarType {
        self.spec().ty
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Field::List(_))
    }

    pub fn token(&self) -> String {
        match self {
            Field::Scalar(spec) => spec.token(),
            Field::List(list) => list.token(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Scalar(spec) => write!(f, "{}: {}", spec.id, spec.token()),
            Field::List(list) => write!(f, "{}: {}[]", list.item.id, list.item.token()),
        }
    }
}

/// Parsed schema: byte order plus the ordered field list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    pub(crate) order: ByteOrder,
    pub(crate) fields: Vec<Field>,
    pub(crate) text: String,
}

impl Schema {
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Row arity.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Schema text exactly as given to the parser.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id() == id)
    }

    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(Field::id)
    }

    /// Human-readable field table.
    pub fn describe(&self) -> String {
        let id_w = self.fields.iter().map(|f| f.id().len()).max().unwrap_or(2).max(2);
        let tok_w = self.fields.iter().map(|f| f.token().len()).max().unwrap_or(4).max(4);

        let mut out = format!(
            "byte order: {} ({})\n",
            self.order.name(),
            self.order.marker()
        );
        for (i, field) in self.fields.iter().enumerate() {
            let kind = match field {
                Field::Scalar(spec) => spec.ty.name().to_string(),
                Field::List(list) => format!("list<{}>", list.item.ty.name()),
            };
            let line = format!(
                "{:>3}  {:<id_w$}  {:<tok_w$}  {}",
                i + 1,
                field.id(),
                field.token(),
                kind,
                id_w = id_w,
                tok_w = tok_w,
            );
            match field.note() {
                Some(note) => out.push_str(&format!("{}  # {}\n", line, note)),
                None => {
                    out.push_str(&line);
                    out.push('\n');
                }
            }
        }
        out
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.order.marker())?;
        for field in &self.fields {
            write!(f, "{}({})", field.token(), field.id())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Length or count qualifier on a type that cannot carry one.
    #[error("field {position}: type '{type_char}' takes no length")]
    UnexpectedLength { position: usize, type_char: char },

    /// Declared string width below 1.
    #[error("field {position}: length of type '{type_char}' should be >= 1")]
    ZeroLength { position: usize, type_char: char },

    /// Declared list count below 1.
    #[error("field {position}: length of list of '{type_char}' should be >= 1")]
    ZeroCount { position: usize, type_char: char },

    /// Number does not fit the platform word.
    #[error("field {position}: number {digits} too large")]
    NumberTooLarge { position: usize, digits: String },

    /// Fixed widths of the schema sum past the largest record body.
    #[error("field {position}: fixed width exceeds {max} bytes")]
    WidthOverflow { position: usize, max: u64 },

    /// Two fields share an id.
    #[error("field {position}: duplicate id {id:?}")]
    DuplicateId { position: usize, id: String },

    #[error("field {position}: unknown type '{type_char}'")]
    UnknownType { position: usize, type_char: char },

    /// Text that is not part of any field token.
    #[error("unexpected input at offset {offset}: {fragment:?}")]
    UnexpectedInput { offset: usize, fragment: String },
}
