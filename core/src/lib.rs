//! dspack-core
//!
//! Schema-driven binary record codec.
//! A compact schema string is compiled once into a packing plan; rows are
//! packed into length-prefixed records and read back lazily.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;

// Wire layers
pub mod length;
pub mod schema;
pub mod plan;
pub mod row;

pub mod codec;
pub mod telemetry;

pub use codec::{dumps, loads, loads_self_described, Codec, Packer, Rows};
pub use config::{PackConfig, ParseOptions};
pub use row::{Row, Value};
pub use schema::{ByteOrder, Schema, SchemaError};
pub use types::{PackError, Result};

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::codec::{Codec, Packer};
    pub use crate::row::{Row, Value};
    pub use crate::types::{PackError, Result};
}
