// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derived loggers carrying one fixed extra field.
//!
//! A [`ContextLogger`] is a lightweight view over a parent
//! [`Logger`](crate::Logger): it exposes the same call surface and adds one
//! fixed `(key, value)` pair as a top-level call field to every record
//! routed through it. The binding lives in the view alone: the parent's
//! context is never written to, so any number of views with different
//! bound values can be used concurrently over the same parent without
//! observing each other.

use serde_json::Value;

use crate::Level;
use crate::logger::Logger;
use crate::record::Fields;

/// A view of a logger that injects one fixed top-level field.
///
/// Built with [`Logger::bind`]. The bound field is a *call* field: it sits
/// at the top level of the record, not inside the parent's nested
/// namespace. The parent's persistent context and any scopes active on the
/// calling thread still compose as usual.
///
/// # Examples
///
/// ```
/// use scopewise::{InMemoryHandler, Logger};
/// use std::sync::Arc;
///
/// let handler = Arc::new(InMemoryHandler::new());
/// let logger = Logger::builder()
///     .name("api")
///     .handler(handler.clone())
///     .build()
///     .unwrap();
///
/// let request_logger = logger.bind("request_id", "R-17");
/// request_logger.info("handling request");
///
/// let record = handler.drain_records().pop().unwrap();
/// assert_eq!(record.fields()["request_id"], "R-17");
/// ```
#[derive(Debug, Clone)]
pub struct ContextLogger<'a> {
    parent: &'a Logger,
    key: String,
    value: Value,
}

impl<'a> ContextLogger<'a> {
    pub(crate) fn new(parent: &'a Logger, key: String, value: Value) -> Self {
        ContextLogger { parent, key, value }
    }

    /// The bound field's key.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message, Fields::new());
    }

    pub fn debug_with(&self, message: &str, fields: Fields) {
        self.log(Level::Debug, message, fields);
    }

    pub fn info(&self, message: &str) {
        self.log(Level::Info, message, Fields::new());
    }

    pub fn info_with(&self, message: &str, fields: Fields) {
        self.log(Level::Info, message, fields);
    }

    pub fn warning(&self, message: &str) {
        self.log(Level::Warning, message, Fields::new());
    }

    pub fn warning_with(&self, message: &str, fields: Fields) {
        self.log(Level::Warning, message, fields);
    }

    pub fn error(&self, message: &str) {
        self.log(Level::Error, message, Fields::new());
    }

    pub fn error_with(&self, message: &str, fields: Fields) {
        self.log(Level::Error, message, fields);
    }

    pub fn critical(&self, message: &str) {
        self.log(Level::Critical, message, Fields::new());
    }

    pub fn critical_with(&self, message: &str, fields: Fields) {
        self.log(Level::Critical, message, fields);
    }

    fn log(&self, level: Level, message: &str, mut fields: Fields) {
        // The binding wins over a call field of the same name.
        fields.insert(self.key.clone(), self.value.clone());
        self.parent.log(level, message, fields, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_handler::InMemoryHandler;
    use crate::registry::GLOBAL_STATE_GUARD;
    use serde_json::json;
    use std::sync::Arc;

    fn capture() -> (Arc<InMemoryHandler>, Logger) {
        let handler = Arc::new(InMemoryHandler::new());
        let logger = Logger::builder()
            .name("api")
            .handler(handler.clone())
            .field("service", "api")
            .build()
            .expect("complete configuration");
        (handler, logger)
    }

    #[test]
    fn binding_is_a_top_level_call_field() {
        let _guard = GLOBAL_STATE_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let (handler, logger) = capture();

        logger.bind("request_id", "R-17").info("handled");

        let record = handler.drain_records().pop().expect("one record");
        assert_eq!(record.fields()["request_id"], json!("R-17"));
        assert!(record.fields()["api"].get("request_id").is_none());
        assert_eq!(record.fields()["api"]["service"], json!("api"));
    }

    #[test]
    fn binding_never_mutates_the_parent() {
        let _guard = GLOBAL_STATE_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let (handler, logger) = capture();

        let bound = logger.bind("request_id", "R-17");
        bound.info("through the view");
        logger.info("through the parent");

        let records = handler.drain_records();
        assert!(records[0].fields().contains_key("request_id"));
        assert!(!records[1].fields().contains_key("request_id"));
        assert!(!logger.context().contains_key("request_id"));
    }

    #[test]
    fn sibling_bindings_do_not_leak_into_each_other() {
        let _guard = GLOBAL_STATE_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let (handler, logger) = capture();

        std::thread::scope(|threads| {
            for id in ["R-1", "R-2"] {
                let view = logger.bind("request_id", id);
                threads.spawn(move || {
                    for _ in 0..50 {
                        view.info_with("tick", crate::fields! { "marker" => id });
                    }
                });
            }
        });

        for record in handler.drain_records() {
            assert_eq!(record.fields()["request_id"], record.fields()["marker"]);
        }
    }

    #[test]
    fn parent_scopes_are_visible_through_the_view() {
        let _guard = GLOBAL_STATE_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let (handler, logger) = capture();

        let _scope = logger.with_context_params("context", crate::fields! { "operation" => "sync" });
        logger.bind("request_id", "R-9").info("scoped");

        let record = handler.drain_records().pop().expect("one record");
        assert_eq!(record.fields()["api"]["context"]["operation"], json!("sync"));
    }
}
