//! plan/types.rs
//! Encoding shapes and compiled segments.

use std::fmt;

use crate::schema::{Count, Field, ScalarType, Width};

/// Wire shape of one field. Every encoder and decoder path matches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Fixed scalar or fixed-length string: `width` bytes.
    Scalar { ty: ScalarType, width: usize },
    /// `[len][bytes]`
    DynBytes,
    /// `count * item_width` contiguous bytes.
    FixedList { ty: ScalarType, item_width: usize, count: usize },
    /// `[payload len]` then `count` x `[len][bytes]`.
    FixedListOfDynBytes { count: usize },
    /// `[count]` then `count * item_width` bytes.
    DynList { ty: ScalarType, item_width: usize },
    /// `[payload len][count]` then `count` x `[len][bytes]`.
    DynListOfDynBytes,
}

impl Shape {
    pub fn of(field: &Field) -> Shape {
        match field {
            Field::Scalar(spec) => match spec.width {
                Width::Fixed(width) => Shape::Scalar { ty: spec.ty, width },
                Width::Dynamic => Shape::DynBytes,
            },
            Field::List(list) => match (list.count, list.item.width) {
                (Count::Fixed(count), Width::Fixed(item_width)) => Shape::FixedList {
                    ty: list.item.ty,
                    item_width,
                    count,
                },
                (Count::Fixed(count), Width::Dynamic) => Shape::FixedListOfDynBytes { count },
                (Count::Dynamic, Width::Fixed(item_width)) => Shape::DynList {
                    ty: list.item.ty,
                    item_width,
                },
                (Count::Dynamic, Width::Dynamic) => Shape::DynListOfDynBytes,
            },
        }
    }

    /// Shapes whose byte count is known from the schema alone.
    pub fn is_fixed(&self) -> bool {
        matches!(self, Shape::Scalar { .. } | Shape::FixedList { .. })
    }

    pub fn fixed_width(&self) -> Option<usize> {
        match *self {
            Shape::Scalar { width, .. } => Some(width),
            Shape::FixedList { item_width, count, .. } => Some(item_width * count),
            _ => None,
        }
    }

    /// Struct-style format token for fixed shapes, e.g. `H`, `3s`, `4Q`.
    pub fn format_token(&self) -> Option<String> {
        match *self {
            Shape::Scalar { ty, width } if ty.is_string() => Some(format!("{}{}", width, ty.type_char())),
            Shape::Scalar { ty, .. } => Some(ty.type_char().to_string()),
            Shape::FixedList { ty, item_width, count } if ty.is_string() => {
                Some(format!("{}{}", item_width * count, ty.type_char()))
            }
            Shape::FixedList { ty, count, .. } => Some(format!("{}{}", count, ty.type_char())),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Scalar { .. } => "scalar",
            Shape::DynBytes => "dyn-bytes",
            Shape::FixedList { .. } => "fixed-list",
            Shape::FixedListOfDynBytes { .. } => "fixed-list<dyn-bytes>",
            Shape::DynList { .. } => "dyn-list",
            Shape::DynListOfDynBytes => "dyn-list<dyn-bytes>",
        }
    }
}

/// One field inside a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPlan {
    /// Position in the schema (and in every row).
    pub index: usize,
    pub id: String,
    pub shape: Shape,
}

/// Maximal run of fixed fields, packed as one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedRun {
    pub fields: Vec<FieldPlan>,
    /// Struct-style format string, order marker included.
    pub format: String,
    /// Total bytes of the run.
    pub width: usize,
}

/// Maximal run of dynamic fields, each with its own prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicRun {
    pub fields: Vec<FieldPlan>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Fixed(FixedRun),
    Dynamic(DynamicRun),
}

impl Segment {
    pub fn is_fixed(&self) -> bool {
        matches!(self, Segment::Fixed(_))
    }

    pub fn fields(&self) -> &[FieldPlan] {
        match self {
            Segment::Fixed(run) => &run.fields,
            Segment::Dynamic(run) => &run.fields,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Fixed(run) => write!(f, "fixed[{}; {} bytes]", run.format, run.width),
            Segment::Dynamic(run) => {
                let shapes: Vec<&str> = run.fields.iter().map(|p| p.shape.name()).collect();
                write!(f, "dynamic[{}]", shapes.join(", "))
            }
        }
    }
}
