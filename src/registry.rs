// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide registry of live loggers and the level broadcast.
//!
//! Every [`Logger`](crate::Logger) registers itself at construction and
//! deregisters when it is dropped, so the registry always describes the set
//! of currently live instances. The registry exists for exactly one
//! operation: [`set_level_global`], which applies a new minimum level to
//! every logger alive at the moment of the call.
//!
//! # Architecture
//!
//! The registry is a mutex-protected vector of entries, each pairing a
//! logger's unique id with a clone of its level cell. Holding level cells
//! rather than the loggers themselves keeps the registry from extending any
//! logger's lifetime: when a logger is dropped, its entry is removed and
//! nothing else survives.
//!
//! # Thread safety
//!
//! All functions here can be called from any thread. Registration,
//! deregistration, and broadcast iteration are serialized by a single
//! mutex; the broadcast snapshots the entries under the lock and applies
//! the level outside it, so a register or deregister landing mid-broadcast
//! cannot corrupt the iteration. A logger registered after the snapshot was
//! taken is simply unaffected by that broadcast; there is no retroactive
//! effect.
//!
//! # Examples
//!
//! ```
//! use scopewise::{InMemoryHandler, Level, Logger, set_level_global};
//! use std::sync::Arc;
//!
//! let logger = Logger::builder()
//!     .name("worker")
//!     .handler(Arc::new(InMemoryHandler::new()))
//!     .level(Level::Info)
//!     .build()
//!     .unwrap();
//!
//! set_level_global(Level::Error);
//! assert_eq!(logger.level(), Level::Error);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};

use crate::level::{Level, LevelCell};

static REGISTRY: OnceLock<Mutex<Vec<RegistryEntry>>> = OnceLock::new();
static NEXT_LOGGER_ID: AtomicU64 = AtomicU64::new(0);

/// One live logger: its unique id and a handle to its level cell.
#[derive(Debug)]
struct RegistryEntry {
    id: u64,
    level: LevelCell,
}

fn lock() -> MutexGuard<'static, Vec<RegistryEntry>> {
    REGISTRY
        .get_or_init(|| Mutex::new(Vec::new()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

/// Registers a new logger's level cell, returning the logger's unique id.
pub(crate) fn register(level: LevelCell) -> u64 {
    let id = NEXT_LOGGER_ID.fetch_add(1, Ordering::Relaxed);
    lock().push(RegistryEntry { id, level });
    id
}

/// Removes the entry for `id`. Called from the logger's `Drop`.
pub(crate) fn deregister(id: u64) {
    lock().retain(|entry| entry.id != id);
}

/// Applies `level` to every logger registered at the time of the call.
///
/// Loggers constructed after the call keep the level they were built with;
/// the broadcast has no retroactive effect. Safe to call concurrently with
/// logger construction, destruction, and other broadcasts.
///
/// # Examples
///
/// ```
/// use scopewise::{InMemoryHandler, Level, Logger, set_level_global};
/// use std::sync::Arc;
///
/// let early = Logger::builder()
///     .name("early")
///     .handler(Arc::new(InMemoryHandler::new()))
///     .level(Level::Debug)
///     .build()
///     .unwrap();
///
/// set_level_global(Level::Warning);
///
/// let late = Logger::builder()
///     .name("late")
///     .handler(Arc::new(InMemoryHandler::new()))
///     .level(Level::Debug)
///     .build()
///     .unwrap();
///
/// assert_eq!(early.level(), Level::Warning);
/// assert_eq!(late.level(), Level::Debug);
/// ```
pub fn set_level_global(level: Level) {
    let cells: Vec<LevelCell> = lock().iter().map(|entry| entry.level.clone()).collect();
    for cell in cells {
        cell.store(level);
    }
}

/// Number of currently registered (live) loggers.
pub fn registered_loggers() -> usize {
    lock().len()
}

#[cfg(test)]
pub(crate) static GLOBAL_STATE_GUARD: Mutex<()> = Mutex::new(());
