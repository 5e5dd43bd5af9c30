// SPDX-License-Identifier: MIT OR Apache-2.0

//! The logger: construction, the logging call surface, and record
//! composition.
//!
//! A [`Logger`] owns a name, one or more handlers, a level, and a
//! [`ContextStore`] of persistent fields. Every log call composes a fresh
//! [`Record`]: the call's own fields stay at the top level, and the
//! contextual namespace (persistent fields overlaid with the calling
//! thread's active scopes) is nested under the logger's name. The record is
//! then handed to every attached handler.
//!
//! Construction goes through [`Builder`]; `name` and at least one handler
//! are required and their absence fails fast with
//! [`ConfigError::MissingField`].

use std::sync::Arc;

use serde_json::Value;

use crate::context::{self, ContextScope, ContextStore};
use crate::error::ConfigError;
use crate::handler::Handler;
use crate::level::{Level, LevelCell};
use crate::message_scope::MessageScope;
use crate::record::{ExcInfo, Fields, Record};
use crate::registry;
use crate::context_logger::ContextLogger;

const DEFAULT_SUCCESS_MSG: &str = "success";
const DEFAULT_FAIL_MSG: &str = "failed";

/// A structured, context-carrying logger.
///
/// # Examples
///
/// ```
/// use scopewise::{InMemoryHandler, Logger, fields};
/// use std::sync::Arc;
///
/// let handler = Arc::new(InMemoryHandler::new());
/// let logger = Logger::builder()
///     .name("payments")
///     .handler(handler.clone())
///     .field("service", "payments")
///     .build()
///     .unwrap();
///
/// logger.info_with("payment completed", fields! { "order_id" => "O1" });
///
/// let record = handler.drain_records().pop().unwrap();
/// assert_eq!(record.message(), "payment completed");
/// assert_eq!(record.fields()["order_id"], "O1");
/// assert_eq!(record.fields()["payments"]["service"], "payments");
/// ```
#[derive(Debug)]
pub struct Logger {
    name: String,
    id: u64,
    handlers: Vec<Arc<dyn Handler>>,
    level: LevelCell,
    context: ContextStore,
    success_msg: String,
    fail_msg: String,
    handle_error: bool,
}

impl Logger {
    /// Starts building a logger. `name` and at least one handler are
    /// required.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// The logger's name. Doubles as the key its contextual namespace is
    /// nested under in every record.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        self.level.load()
    }

    /// Sets the minimum level a record must have to be emitted.
    pub fn set_level(&self, level: Level) {
        self.level.store(level);
    }

    /// Inserts or overwrites a persistent context field. The field appears
    /// in the logger's namespace on every subsequent record, for as long as
    /// the logger lives or until [`remove_context`](Self::remove_context).
    pub fn set_context(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.context.set(key, value.into());
    }

    /// Removes a persistent context field. No-op when absent.
    pub fn remove_context(&self, key: &str) {
        self.context.remove(key);
    }

    /// A snapshot of the persistent context fields.
    pub fn context(&self) -> Fields {
        self.context.snapshot()
    }

    /// Pushes a named sub-context visible to every record this logger (or a
    /// [`ContextLogger`] derived from it) composes on the current thread,
    /// until the returned guard is dropped.
    ///
    /// Nesting the same key is legal: the inner scope shadows the outer one
    /// and unwinding restores values in LIFO order. Scopes pushed by other
    /// threads are invisible here, and vice versa.
    ///
    /// # Examples
    ///
    /// ```
    /// use scopewise::{InMemoryHandler, Logger, fields};
    /// use std::sync::Arc;
    ///
    /// let handler = Arc::new(InMemoryHandler::new());
    /// let logger = Logger::builder()
    ///     .name("payments")
    ///     .handler(handler.clone())
    ///     .build()
    ///     .unwrap();
    ///
    /// {
    ///     let _scope = logger.with_context_params("context", fields! { "operation" => "refresh" });
    ///     logger.info("working");
    /// }
    /// logger.info("done");
    ///
    /// let records = handler.drain_records();
    /// assert_eq!(records[0].fields()["payments"]["context"]["operation"], "refresh");
    /// assert!(records[1].fields()["payments"].get("context").is_none());
    /// ```
    pub fn with_context_params(&self, key: impl Into<String>, params: Fields) -> ContextScope {
        context::push_scope(self.id, key.into(), params)
    }

    /// A message scope with the success/failure messages and error policy
    /// this logger was built with. See [`MessageScope`].
    pub fn scope(&self) -> MessageScope<'_> {
        MessageScope::new(
            self,
            self.success_msg.clone(),
            self.fail_msg.clone(),
            self.handle_error,
        )
    }

    /// A message scope with an overridden success message.
    pub fn with_message(&self, success: impl Into<String>) -> MessageScope<'_> {
        MessageScope::new(self, success.into(), self.fail_msg.clone(), self.handle_error)
    }

    /// Derives a view of this logger that adds one fixed top-level field to
    /// every call routed through it, without touching this logger's state.
    pub fn bind(&self, key: impl Into<String>, value: impl Into<Value>) -> ContextLogger<'_> {
        ContextLogger::new(self, key.into(), value.into())
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message, Fields::new(), None);
    }

    pub fn debug_with(&self, message: &str, fields: Fields) {
        self.log(Level::Debug, message, fields, None);
    }

    pub fn info(&self, message: &str) {
        self.log(Level::Info, message, Fields::new(), None);
    }

    pub fn info_with(&self, message: &str, fields: Fields) {
        self.log(Level::Info, message, fields, None);
    }

    pub fn warning(&self, message: &str) {
        self.log(Level::Warning, message, Fields::new(), None);
    }

    pub fn warning_with(&self, message: &str, fields: Fields) {
        self.log(Level::Warning, message, fields, None);
    }

    pub fn error(&self, message: &str) {
        self.log(Level::Error, message, Fields::new(), None);
    }

    pub fn error_with(&self, message: &str, fields: Fields) {
        self.log(Level::Error, message, fields, None);
    }

    pub fn critical(&self, message: &str) {
        self.log(Level::Critical, message, Fields::new(), None);
    }

    pub fn critical_with(&self, message: &str, fields: Fields) {
        self.log(Level::Critical, message, fields, None);
    }

    /// Composes a record and hands it to every attached handler.
    ///
    /// The call's fields stay top-level; the persistent snapshot, overlaid
    /// with the calling thread's active scopes, is nested under the
    /// logger's name.
    pub(crate) fn log(
        &self,
        level: Level,
        message: &str,
        fields: Fields,
        exc: Option<ExcInfo>,
    ) {
        if level < self.level.load() {
            return;
        }
        let mut record = Record::new(level, self.name.clone(), message.to_string());
        record.fields = fields;

        let mut namespace = self.context.snapshot();
        context::apply_scopes(self.id, &mut namespace);
        record.fields.insert(self.name.clone(), Value::Object(namespace));
        record.exc = exc;

        if let Some((last, rest)) = self.handlers.split_last() {
            for handler in rest {
                handler.emit(record.clone());
            }
            last.emit(record);
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        registry::deregister(self.id);
        for handler in &self.handlers {
            handler.flush();
        }
    }
}

/*
Boilerplate notes.

# Logger

Clone is out: the registry identifies instances by id, and two loggers
sharing one id would deregister each other. PartialEq/Eq unclear (data vs
provenance), skip. Default can't exist, name and handler are required.
Display would just duplicate name(). Send/Sync hold automatically and are
relied on: one logger is shared across every thread that logs through it.
*/

/// Builder for [`Logger`]. Obtained from [`Logger::builder`].
#[derive(Debug)]
pub struct Builder {
    name: Option<String>,
    handlers: Vec<Arc<dyn Handler>>,
    level: Level,
    success_msg: String,
    fail_msg: String,
    handle_error: bool,
    fields: Fields,
}

impl Builder {
    fn new() -> Self {
        Builder {
            name: None,
            handlers: Vec::new(),
            level: Level::Debug,
            success_msg: DEFAULT_SUCCESS_MSG.to_string(),
            fail_msg: DEFAULT_FAIL_MSG.to_string(),
            handle_error: false,
            fields: Fields::new(),
        }
    }

    /// Required. The logger's name and the key of its context namespace.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attaches a handler. At least one is required; every composed record
    /// reaches each attached handler exactly once.
    pub fn handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Minimum level for emission. Defaults to [`Level::Debug`], i.e.
    /// everything passes.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Default success message for message scopes. Defaults to `"success"`.
    pub fn success_msg(mut self, message: impl Into<String>) -> Self {
        self.success_msg = message.into();
        self
    }

    /// Default failure message for message scopes. Defaults to `"failed"`.
    pub fn fail_msg(mut self, message: impl Into<String>) -> Self {
        self.fail_msg = message.into();
        self
    }

    /// Whether message scopes consume errors after logging them. Defaults
    /// to `false` (errors are re-raised to the caller).
    pub fn handle_error(mut self, handle: bool) -> Self {
        self.handle_error = handle;
        self
    }

    /// Adds one persistent context field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Merges a map of persistent context fields.
    pub fn fields(mut self, fields: Fields) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Builds the logger and registers it for level broadcasts.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingField`] when `name` or every handler is
    /// missing.
    pub fn build(self) -> Result<Logger, ConfigError> {
        let name = self.name.ok_or(ConfigError::MissingField("name"))?;
        if self.handlers.is_empty() {
            return Err(ConfigError::MissingField("handler"));
        }
        let level = LevelCell::new(self.level);
        let id = registry::register(level.clone());
        Ok(Logger {
            name,
            id,
            handlers: self.handlers,
            level,
            context: ContextStore::new(self.fields),
            success_msg: self.success_msg,
            fail_msg: self.fail_msg,
            handle_error: self.handle_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_handler::InMemoryHandler;
    use crate::registry::GLOBAL_STATE_GUARD;
    use serde_json::json;

    fn capture() -> (Arc<InMemoryHandler>, Logger) {
        let handler = Arc::new(InMemoryHandler::new());
        let logger = Logger::builder()
            .name("payments")
            .handler(handler.clone())
            .field("service", "payments")
            .field("env", "prod")
            .build()
            .expect("complete configuration");
        (handler, logger)
    }

    #[test]
    fn build_without_name_fails_fast() {
        let _guard = GLOBAL_STATE_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let result = Logger::builder()
            .handler(Arc::new(InMemoryHandler::new()))
            .build();
        assert_eq!(result.unwrap_err(), ConfigError::MissingField("name"));
    }

    #[test]
    fn build_without_handler_fails_fast() {
        let _guard = GLOBAL_STATE_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let result = Logger::builder().name("orphan").build();
        assert_eq!(result.unwrap_err(), ConfigError::MissingField("handler"));
    }

    #[test]
    fn call_fields_stay_top_level_and_context_nests() {
        let _guard = GLOBAL_STATE_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let (handler, logger) = capture();

        logger.info_with("x", crate::fields! { "order_id" => "O1" });

        let record = handler.drain_records().pop().expect("one record");
        assert_eq!(record.level(), Level::Info);
        assert_eq!(record.message(), "x");
        assert_eq!(record.fields()["order_id"], json!("O1"));
        assert_eq!(
            record.fields()["payments"],
            json!({"service": "payments", "env": "prod"})
        );
    }

    #[test]
    fn empty_context_still_nests_under_the_logger_name() {
        let _guard = GLOBAL_STATE_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let handler = Arc::new(InMemoryHandler::new());
        let logger = Logger::builder()
            .name("bare")
            .handler(handler.clone())
            .build()
            .expect("complete configuration");

        logger.info("x");

        let record = handler.drain_records().pop().expect("one record");
        assert_eq!(record.fields()["bare"], json!({}));
    }

    #[test]
    fn set_and_remove_context_are_visible_to_later_records() {
        let _guard = GLOBAL_STATE_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let (handler, logger) = capture();

        logger.set_context("region", "eu-west-1");
        logger.info("with region");
        logger.remove_context("region");
        logger.info("without region");

        let records = handler.drain_records();
        assert_eq!(records[0].fields()["payments"]["region"], json!("eu-west-1"));
        assert!(records[1].fields()["payments"].get("region").is_none());
    }

    #[test]
    fn records_below_the_level_are_filtered() {
        let _guard = GLOBAL_STATE_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let handler = Arc::new(InMemoryHandler::new());
        let logger = Logger::builder()
            .name("quiet")
            .handler(handler.clone())
            .level(Level::Warning)
            .build()
            .expect("complete configuration");

        logger.info("dropped");
        logger.warning("kept");

        let records = handler.drain_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message(), "kept");
    }

    #[test]
    fn every_handler_receives_each_record_once() {
        let _guard = GLOBAL_STATE_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let first = Arc::new(InMemoryHandler::new());
        let second = Arc::new(InMemoryHandler::new());
        let logger = Logger::builder()
            .name("fanout")
            .handler(first.clone())
            .handler(second.clone())
            .build()
            .expect("complete configuration");

        logger.info("shared");

        assert_eq!(first.drain_records().len(), 1);
        assert_eq!(second.drain_records().len(), 1);
    }

    #[test]
    fn drop_deregisters_the_logger() {
        let _guard = GLOBAL_STATE_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let before = crate::registry::registered_loggers();
        let (_handler, logger) = capture();
        assert_eq!(crate::registry::registered_loggers(), before + 1);
        drop(logger);
        assert_eq!(crate::registry::registered_loggers(), before);
    }
}
