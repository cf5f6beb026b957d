//! codec/rows.rs
//! Lazy record iterator over a packed buffer.

use std::iter::FusedIterator;

use crate::codec::Codec;
use crate::length::decode_len;
use crate::row::{decode_next, Row};
use crate::telemetry::TelemetryCounters;
use crate::types::{PackError, Result};

/// Iterator over the records of one buffer.
///
/// Yields `Err` at most once and then stops. A clone continues from the
/// same cursor independently; `Codec::decode_all` starts over.
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    codec: &'a Codec,
    buf: &'a [u8],
    cursor: usize,
    done: bool,
    counters: TelemetryCounters,
}

impl<'a> Rows<'a> {
    pub(crate) fn new(codec: &'a Codec, buf: &'a [u8], cursor: usize) -> Self {
        Self {
            codec,
            buf,
            cursor,
            done: false,
            counters: TelemetryCounters::default(),
        }
    }

    /// Offset of the next record.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn counters(&self) -> &TelemetryCounters {
        &self.counters
    }

    fn fail(&mut self, e: PackError) -> Option<Result<Row>> {
        self.done = true;
        Some(Err(e))
    }
}

impl<'a> Iterator for Rows<'a> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match decode_next(self.codec, self.buf, self.cursor) {
            Ok(Some((row, next))) => {
                let (prefix, _) = match decode_len(self.buf, self.cursor) {
                    Ok(v) => v,
                    Err(e) => return self.fail(e.into()),
                };
                self.counters.add_decoded(next - self.cursor, prefix);
                self.cursor = next;
                Some(Ok(row))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => self.fail(e),
        }
    }
}

impl FusedIterator for Rows<'_> {}
