// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent and scoped context for loggers.
//!
//! Two layers feed the contextual namespace of every composed record:
//!
//! - [`ContextStore`]: the persistent fields owned by one logger, shared by
//!   every thread logging through it and mutated via
//!   [`Logger::set_context`](crate::Logger::set_context) and
//!   [`Logger::remove_context`](crate::Logger::remove_context).
//! - A thread-local stack of scoped frames pushed by
//!   [`Logger::with_context_params`](crate::Logger::with_context_params).
//!   Frames are tagged with the owning logger's id, so scopes opened on the
//!   same logger by concurrent threads never observe each other, and scopes
//!   on different loggers are independent.
//!
//! The stack is unwound by [`ContextScope`] guards. Each guard removes
//! exactly the frame it pushed on every exit path (normal return, early
//! return, or unwinding), so no frame is ever orphaned. During record
//! composition the active frames for the logger are overlaid onto the
//! persistent snapshot in push order, which makes same-key nesting shadow
//! and restore in LIFO order without ever mutating the shared store.

use std::cell::RefCell;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::record::Fields;

static SCOPE_ID: AtomicU64 = AtomicU64::new(0);

thread_local! {
    static SCOPES: RefCell<Vec<ScopeEntry>> = const { RefCell::new(Vec::new()) };
}

/// One active scoped sub-context on the current thread.
#[derive(Debug)]
struct ScopeEntry {
    logger_id: u64,
    scope_id: u64,
    key: String,
    params: Fields,
}

/// Persistent key/value fields owned by a single logger.
#[derive(Debug, Default)]
pub(crate) struct ContextStore {
    fields: Mutex<Fields>,
}

impl ContextStore {
    pub(crate) fn new(fields: Fields) -> Self {
        ContextStore {
            fields: Mutex::new(fields),
        }
    }

    /// Inserts or overwrites. Last write wins.
    pub(crate) fn set(&self, key: impl Into<String>, value: Value) {
        self.lock().insert(key.into(), value);
    }

    /// No-op when the key is absent.
    pub(crate) fn remove(&self, key: &str) {
        self.lock().remove(key);
    }

    /// An isolated copy of the current fields. Concurrent writers cannot
    /// corrupt a snapshot once taken.
    pub(crate) fn snapshot(&self) -> Fields {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Fields> {
        // A poisoned store still holds coherent data; recover it rather
        // than refuse to log.
        self.fields.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Pushes a scoped sub-context for `logger_id` on the current thread.
pub(crate) fn push_scope(logger_id: u64, key: String, params: Fields) -> ContextScope {
    let scope_id = SCOPE_ID.fetch_add(1, Ordering::Relaxed);
    SCOPES.with(|stack| {
        stack.borrow_mut().push(ScopeEntry {
            logger_id,
            scope_id,
            key,
            params,
        });
    });
    ContextScope { scope_id }
}

/// Overlays the current thread's active frames for `logger_id` onto
/// `namespace`, in push order: an inner frame at the same key shadows the
/// outer frame and the persistent field alike.
pub(crate) fn apply_scopes(logger_id: u64, namespace: &mut Fields) {
    SCOPES.with(|stack| {
        for entry in stack.borrow().iter() {
            if entry.logger_id == logger_id {
                namespace.insert(entry.key.clone(), Value::Object(entry.params.clone()));
            }
        }
    });
}

/// Guard for one scoped sub-context.
///
/// While the guard lives, the sub-context is visible to every record
/// composed by the owning logger on this thread. Dropping the guard removes
/// the frame; whatever the key resolved to before the scope (an outer
/// frame, a persistent field, or nothing) becomes visible again.
#[must_use = "the scoped context is removed as soon as this guard is dropped"]
#[derive(Debug)]
pub struct ContextScope {
    scope_id: u64,
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        // try_with: during thread teardown the stack may already be gone,
        // and restoration must never panic past the scope boundary.
        let _ = SCOPES.try_with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(index) = stack.iter().rposition(|e| e.scope_id == self.scope_id) {
                stack.remove(index);
            }
        });
    }
}
