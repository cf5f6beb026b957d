//! Packing plans.
//!
//! Responsibilities:
//! - Classify fields into the six wire shapes
//! - Group contiguous same-class fields into segments
//!
//! Non-responsibilities:
//! - Byte layout of values (see `row`)
//! - Parsing

pub mod types;
pub mod compile;

pub use types::{DynamicRun, FieldPlan, FixedRun, Segment, Shape};
pub use compile::compile;
