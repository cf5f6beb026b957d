//! config.rs
//! Parse and pack options.
//!
//! Defaults are the strict, recommended behavior; every field can be
//! loaded from JSON next to other service configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PACK_CAPACITY;

/// Schema parser options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Skip text that matches no field token instead of failing.
    pub allow_trailing: bool,
}

impl ParseOptions {
    /// Lenient parsing: unmatched text is logged and dropped.
    pub fn permissive() -> Self {
        Self { allow_trailing: true }
    }
}

/// Packer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Initial output buffer capacity in bytes.
    pub initial_capacity: usize,
    /// Write a schema block before the first record.
    pub embed_schema: bool,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_PACK_CAPACITY,
            embed_schema: false,
        }
    }
}

impl PackConfig {
    pub fn new(initial_capacity: Option<usize>, embed_schema: Option<bool>) -> Self {
        let defaults = Self::default();
        Self {
            initial_capacity: initial_capacity.unwrap_or(defaults.initial_capacity),
            embed_schema: embed_schema.unwrap_or(defaults.embed_schema),
        }
    }
}
