//! telemetry/snapshot.rs
//!
//! Immutable view over `TelemetryCounters` with derived ratios.

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub rows_encoded: u64,
    pub rows_decoded: u64,
    pub bytes_records: u64,
    pub bytes_prefix: u64,
    pub bytes_schema: u64,
    /// Outer prefix bytes per record byte.
    pub prefix_overhead_ratio: f64,
    pub avg_record_bytes: f64,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters) -> Self {
        let rows = counters.rows_encoded + counters.rows_decoded;

        let prefix_overhead_ratio = if counters.bytes_records > 0 {
            counters.bytes_prefix as f64 / counters.bytes_records as f64
        } else {
            0.0
        };

        let avg_record_bytes = if rows > 0 {
            counters.bytes_records as f64 / rows as f64
        } else {
            0.0
        };

        Self {
            rows_encoded: counters.rows_encoded,
            rows_decoded: counters.rows_decoded,
            bytes_records: counters.bytes_records,
            bytes_prefix: counters.bytes_prefix,
            bytes_schema: counters.bytes_schema,
            prefix_overhead_ratio,
            avg_record_bytes,
        }
    }

    /// Internal invariants: prefixes never exceed the records they frame.
    pub fn sanity_check(&self) -> bool {
        self.bytes_prefix <= self.bytes_records && self.prefix_overhead_ratio <= 1.0
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
