// SPDX-License-Identifier: MIT OR Apache-2.0
use std::io::Write;

use crate::format::Formatter;
use crate::handler::Handler;
use crate::record::Record;

/// Which standard stream a [`StreamHandler`] writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamTarget {
    Stdout,
    Stderr,
}

/**
A handler that formats records and writes them, one per line, to a standard
stream.

The handler writes to the real stream, not through the raw output slot: a
[`StreamGate`](crate::StreamGate) silences raw output while structured
records keep flowing.
 */
#[derive(Debug)]
pub struct StreamHandler {
    formatter: Box<dyn Formatter>,
    target: StreamTarget,
}

impl StreamHandler {
    pub fn new(target: StreamTarget, formatter: Box<dyn Formatter>) -> Self {
        StreamHandler { formatter, target }
    }

    /// A handler writing formatted records to stdout.
    pub fn stdout(formatter: impl Formatter + 'static) -> Self {
        Self::new(StreamTarget::Stdout, Box::new(formatter))
    }

    /// A handler writing formatted records to stderr.
    pub fn stderr(formatter: impl Formatter + 'static) -> Self {
        Self::new(StreamTarget::Stderr, Box::new(formatter))
    }

    fn write_line(stream: &mut impl Write, line: &str) {
        stream
            .write_all(line.as_bytes())
            .expect("can't write log line");
        stream.write_all(b"\n").expect("can't write log line");
    }
}

impl Handler for StreamHandler {
    fn emit(&self, record: Record) {
        let line = self.formatter.format(&record);
        match self.target {
            StreamTarget::Stdout => Self::write_line(&mut std::io::stdout().lock(), &line),
            StreamTarget::Stderr => Self::write_line(&mut std::io::stderr().lock(), &line),
        }
    }

    fn flush(&self) {
        match self.target {
            StreamTarget::Stdout => {
                let _ = std::io::stdout().lock().flush();
            }
            StreamTarget::Stderr => {
                let _ = std::io::stderr().lock().flush();
            }
        }
    }
}
