//! telemetry/counters.rs
//! Mutable counters updated while packing and unpacking.
//!
//! Summary: Collects record counts and byte counts per packer or reader.
//! Converted into an immutable `TelemetrySnapshot` on demand.
use std::ops::AddAssign;
use serde::{Deserialize, Serialize};

/// Deterministic counters collected during packing and unpacking
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub rows_encoded: u64,
    pub rows_decoded: u64,
    /// Record bytes, outer prefix included.
    pub bytes_records: u64,
    /// Outer prefix bytes only.
    pub bytes_prefix: u64,
    /// Schema block bytes.
    pub bytes_schema: u64,
}

impl TelemetryCounters {
    /// Record one encoded record of `record_len` bytes.
    pub fn add_encoded(&mut self, record_len: usize, prefix_len: usize) {
        self.rows_encoded += 1;
        self.bytes_records += record_len as u64;
        self.bytes_prefix += prefix_len as u64;
    }

    /// Record one decoded record of `record_len` bytes.
    pub fn add_decoded(&mut self, record_len: usize, prefix_len: usize) {
        self.rows_decoded += 1;
        self.bytes_records += record_len as u64;
        self.bytes_prefix += prefix_len as u64;
    }

    pub fn add_schema_block(&mut self, block_len: usize) {
        self.bytes_schema += block_len as u64;
    }

    /// Total bytes seen, schema block included.
    pub fn total_bytes(&self) -> u64 {
        self.bytes_records + self.bytes_schema
    }

    // Per-worker counters are merged after the fact; no shared state while packing.
    pub fn merge(&mut self, other: &TelemetryCounters) {
        self.rows_encoded += other.rows_encoded;
        self.rows_decoded += other.rows_decoded;
        self.bytes_records += other.bytes_records;
        self.bytes_prefix += other.bytes_prefix;
        self.bytes_schema += other.bytes_schema;
    }
}

impl AddAssign for TelemetryCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
