//! codec/pack.rs
//! Append-only record writer.

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::codec::stream::write_schema_block;
use crate::codec::Codec;
use crate::config::PackConfig;
use crate::length::decode_len;
use crate::row::{encode_row, Value};
use crate::telemetry::{TelemetryCounters, TelemetrySnapshot};
use crate::types::Result;

/// Packs rows, in call order, into one growing buffer.
///
/// A row that fails to encode leaves the buffer as it was.
#[derive(Debug)]
pub struct Packer {
    codec: Codec,
    buf: BytesMut,
    rows: u64,
    counters: TelemetryCounters,
    config: PackConfig,
}

impl Packer {
    pub fn new(codec: Codec) -> Self {
        Self::with_config(codec, PackConfig::default())
    }

    pub fn with_config(codec: Codec, config: PackConfig) -> Self {
        let mut packer = Self {
            codec,
            buf: BytesMut::with_capacity(config.initial_capacity),
            rows: 0,
            counters: TelemetryCounters::default(),
            config,
        };
        packer.start();
        packer
    }

    /// Packer whose output starts with the schema text.
    pub fn with_schema_block(codec: Codec) -> Self {
        Self::with_config(codec, PackConfig::new(None, Some(true)))
    }

    fn start(&mut self) {
        if !self.config.embed_schema {
            return;
        }
        match write_schema_block(self.codec.schema(), &mut self.buf) {
            Ok(n) => {
                self.counters.add_schema_block(n);
                debug!("[PACK] schema block of {} bytes", n);
            }
            // Schema text beyond 2^63 bytes cannot exist in memory.
            Err(e) => debug!("[PACK] schema block skipped: {}", e),
        }
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// Append one record.
    ///
    /// # Returns
    /// - `Ok(n)` with the bytes appended.
    /// - `Err(..)` with the buffer unchanged.
    pub fn add_row(&mut self, row: &[Value]) -> Result<usize> {
        let start = self.buf.len();
        let written = encode_row(&self.codec, row, &mut self.buf)?;
        let (prefix, _) = decode_len(&self.buf, start)?;

        self.rows += 1;
        self.counters.add_encoded(written, prefix);
        trace!("[PACK] row {} ({} bytes)", self.rows, written);
        Ok(written)
    }

    /// Append a batch of records.
    ///
    /// The batch is all-or-nothing: on the first failing row the buffer is
    /// rolled back to where the batch started.
    pub fn add_rows<I, R>(&mut self, rows: I) -> Result<usize>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[Value]>,
    {
        let start = self.buf.len();
        let saved = (self.rows, self.counters.clone());

        let mut total = 0usize;
        for row in rows {
            match self.add_row(row.as_ref()) {
                Ok(n) => total += n,
                Err(e) => {
                    self.buf.truncate(start);
                    (self.rows, self.counters) = saved;
                    return Err(e);
                }
            }
        }
        Ok(total)
    }

    /// Append a record given as `(id, value)` pairs in any order.
    pub fn add_named_row<K: AsRef<str>>(&mut self, named: &[(K, Value)]) -> Result<usize> {
        let row = self.codec.row_from_named(named)?;
        self.add_row(&row)
    }

    /// Drop every record; an embedded schema block is written again.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.rows = 0;
        self.counters = TelemetryCounters::default();
        self.start();
    }

    pub fn data(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    pub fn counters(&self) -> &TelemetryCounters {
        &self.counters
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot::from(&self.counters)
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}
