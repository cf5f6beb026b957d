//! Row codec.
//!
//! Responsibilities:
//! - Value model for rows at the API boundary
//! - Encode a row against a compiled plan into one length-prefixed record
//! - Decode records back into rows with strict bounds checks
//!
//! Non-responsibilities:
//! - Buffer ownership (see `codec::Packer`)
//! - Schema parsing and plan compilation

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{Row, Value};
pub use encode::encode_row;
pub use decode::decode_next;
