// SPDX-License-Identifier: MIT OR Apache-2.0

//! Formatters turning a composed record into one output line.
//!
//! Formatters are the bridge between the record composer and a
//! [`StreamHandler`](crate::StreamHandler): [`JsonFormatter`] renders
//! machine-readable JSON lines for observability pipelines,
//! [`PrettyFormatter`] renders colored, human-readable console output for
//! development. Both accept constructor-default parameters that appear in
//! every formatted record unless the record itself supplies the same key.

mod json;
mod pretty;

pub use json::JsonFormatter;
pub use pretty::PrettyFormatter;

use crate::record::Record;
use std::fmt::Debug;

/// Renders a composed record into one output line.
pub trait Formatter: Debug + Send + Sync {
    fn format(&self, record: &Record) -> String;
}
