//! Codec facade.
//!
//! Responsibilities:
//! - Own one schema and its compiled plan, shared via `Arc`
//! - Pack rows into a growing buffer (`Packer`)
//! - Iterate records lazily (`Rows`)
//! - Whole-buffer helpers and the optional schema block
//!
//! Non-responsibilities:
//! - Field layout rules (see `plan`)
//! - Value encoding (see `row`)

pub mod types;
pub mod pack;
pub mod rows;
pub mod stream;

pub use types::Codec;
pub use pack::Packer;
pub use rows::Rows;
pub use stream::{dumps, loads, loads_self_described, read_schema_block, write_schema_block};
