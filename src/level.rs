// SPDX-License-Identifier: MIT OR Apache-2.0

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::ParseLevelError;

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Diagnostic detail, normally filtered out of production pipelines
    Debug,
    /// Normal operation
    Info,
    /// Suspicious condition
    Warning,
    /// Runtime error
    Error,
    /// The process cannot meaningfully continue
    Critical,
}

impl Level {
    /// The level name as it appears in formatted records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    fn from_u8(raw: u8) -> Level {
        match raw {
            0 => Level::Debug,
            1 => Level::Info,
            2 => Level::Warning,
            3 => Level::Error,
            _ => Level::Critical,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARNING" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            "CRITICAL" => Ok(Level::Critical),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Shared, atomically updated storage for one logger's minimum level.
///
/// Clones of the cell are handed to the global registry so that a level
/// broadcast reaches the owning logger without holding any lock while the
/// new level is stored.
#[derive(Debug, Clone)]
pub(crate) struct LevelCell(Arc<AtomicU8>);

impl LevelCell {
    pub(crate) fn new(level: Level) -> Self {
        LevelCell(Arc::new(AtomicU8::new(level as u8)))
    }

    pub(crate) fn load(&self) -> Level {
        Level::from_u8(self.0.load(Ordering::Relaxed))
    }

    pub(crate) fn store(&self, level: Level) {
        self.0.store(level as u8, Ordering::Relaxed);
    }
}
