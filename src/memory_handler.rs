// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Handler
//!
//! This module provides an in-memory sink for testing and debugging. The
//! `InMemoryHandler` keeps composed records in memory rather than writing
//! them anywhere, making it ideal for:
//!
//! - Unit testing code that logs through this crate
//! - Programmatically examining composed records, fields and all
//! - Capturing output in environments where the standard streams are
//!   redirected or unavailable
//!
//! ## Architecture
//!
//! The handler stores records behind a `Mutex<Vec<Record>>`, so multiple
//! threads can log concurrently while tests retain a consistent view of the
//! accumulated records.

use std::sync::Mutex;

use crate::handler::Handler;
use crate::record::Record;

/// A handler that keeps every record it receives in memory.
///
/// Records are retrieved, and the buffer cleared, with
/// [`drain_records`](Self::drain_records) (structured access, the common
/// case in tests) or [`drain_logs`](Self::drain_logs) (one rendered line
/// per record).
///
/// # Example
///
/// ```
/// use scopewise::{InMemoryHandler, Logger, fields};
/// use std::sync::Arc;
///
/// let handler = Arc::new(InMemoryHandler::new());
/// let logger = Logger::builder()
///     .name("worker")
///     .handler(handler.clone())
///     .build()
///     .unwrap();
///
/// logger.info_with("task picked up", fields! { "task_id" => 7 });
///
/// let records = handler.drain_records();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].fields()["task_id"], 7);
///
/// // The buffer is now empty.
/// assert!(handler.drain_records().is_empty());
/// ```
#[derive(Debug)]
pub struct InMemoryHandler {
    records: Mutex<Vec<Record>>,
}

// Boilerplate: Default implemented (empty buffer is the obvious zero value);
// Clone deliberately not (a capture buffer should have one owner of record);
// PartialEq/Hash skipped, comparing sinks is meaningless.

impl Default for InMemoryHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryHandler {
    pub fn new() -> Self {
        InMemoryHandler {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Takes all accumulated records, clearing the buffer.
    pub fn drain_records(&self) -> Vec<Record> {
        let mut records = self.records.lock().unwrap();
        std::mem::take(&mut *records)
    }

    /// Renders and takes all accumulated records, one line per record,
    /// clearing the buffer.
    pub fn drain_logs(&self) -> String {
        self.drain_records()
            .iter()
            .map(Record::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Handler for InMemoryHandler {
    fn emit(&self, record: Record) {
        let mut records = self.records.lock().unwrap();
        records.push(record);
    }

    /// No-op: nothing buffered outside the vector itself.
    fn flush(&self) {}
}
