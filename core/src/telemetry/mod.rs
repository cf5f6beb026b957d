//! telemetry/mod.rs
//! Counters and immutable snapshots for packers and readers.
//!
//! Notes:
//! - Each packer or reader owns its counters; merge them after the fact.
//! - Snapshots are plain data and serialize to JSON.

pub mod counters;
pub mod snapshot;

pub use counters::*;
pub use snapshot::*;
