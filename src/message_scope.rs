// SPDX-License-Identifier: MIT OR Apache-2.0

//! Block boundaries that log their own outcome.
//!
//! A [`MessageScope`] wraps a fallible body: it emits one INFO record with
//! the success message when the body returns `Ok`, or one failure record
//! carrying captured error info when it returns `Err`. The error is either
//! consumed (logged at WARNING) or re-raised to the caller (logged at
//! ERROR), per the `handle_error` policy. A panic in the body emits the
//! failure record while unwinding and always propagates.

use crate::Level;
use crate::logger::Logger;
use crate::record::{ExcInfo, Fields};

/// A scoped block boundary that emits a success or failure record.
///
/// Built by [`Logger::scope`] (messages and error policy from the logger's
/// construction) or [`Logger::with_message`]; both can be overridden
/// per-scope before [`run`](Self::run).
///
/// # Examples
///
/// ```
/// use scopewise::{InMemoryHandler, Logger};
/// use std::sync::Arc;
///
/// let handler = Arc::new(InMemoryHandler::new());
/// let logger = Logger::builder()
///     .name("jobs")
///     .handler(handler.clone())
///     .build()
///     .unwrap();
///
/// let outcome = logger
///     .with_message("job finished")
///     .fail_message("job failed")
///     .handle_error(true)
///     .run(|| "21".parse::<i32>().map(|n| n * 2));
///
/// assert_eq!(outcome, Ok(Some(42)));
/// let record = handler.drain_records().pop().unwrap();
/// assert_eq!(record.message(), "job finished");
/// ```
#[must_use = "a message scope logs nothing until `run` is called"]
#[derive(Debug)]
pub struct MessageScope<'a> {
    logger: &'a Logger,
    success: String,
    fail: String,
    handle_error: bool,
}

impl<'a> MessageScope<'a> {
    pub(crate) fn new(logger: &'a Logger, success: String, fail: String, handle_error: bool) -> Self {
        MessageScope {
            logger,
            success,
            fail,
            handle_error,
        }
    }

    /// Overrides the failure message for this scope.
    pub fn fail_message(mut self, fail: impl Into<String>) -> Self {
        self.fail = fail.into();
        self
    }

    /// Overrides the error policy for this scope. When `true`, an `Err`
    /// from the body is consumed after the failure record is emitted and
    /// the scope returns `Ok(None)`; when `false`, the error is re-raised.
    pub fn handle_error(mut self, handle: bool) -> Self {
        self.handle_error = handle;
        self
    }

    /// Runs the body, emitting exactly one outcome record.
    ///
    /// - `Ok(v)` → INFO record with the success message, returns
    ///   `Ok(Some(v))`.
    /// - `Err(e)` → failure record with `exc` captured from `e`: WARNING
    ///   and `Ok(None)` when errors are handled, ERROR and `Err(e)` when
    ///   they are not.
    /// - Panic → an ERROR failure record is emitted during unwinding and
    ///   the panic propagates; `handle_error` consumes errors, never
    ///   panics.
    pub fn run<T, E, F>(self, body: F) -> Result<Option<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: std::error::Error,
    {
        let mut monitor = PanicMonitor {
            logger: self.logger,
            fail: &self.fail,
            armed: true,
        };
        let outcome = body();
        monitor.armed = false;
        drop(monitor);

        match outcome {
            Ok(value) => {
                self.logger.log(Level::Info, &self.success, Fields::new(), None);
                Ok(Some(value))
            }
            Err(error) => {
                let exc = ExcInfo::from_error(&error);
                if self.handle_error {
                    self.logger
                        .log(Level::Warning, &self.fail, Fields::new(), Some(exc));
                    Ok(None)
                } else {
                    self.logger
                        .log(Level::Error, &self.fail, Fields::new(), Some(exc));
                    Err(error)
                }
            }
        }
    }
}

/// Emits the failure record when the body unwinds instead of returning.
struct PanicMonitor<'a> {
    logger: &'a Logger,
    fail: &'a str,
    armed: bool,
}

impl Drop for PanicMonitor<'_> {
    fn drop(&mut self) {
        if self.armed && std::thread::panicking() {
            self.logger
                .log(Level::Error, self.fail, Fields::new(), Some(ExcInfo::from_panic()));
        }
    }
}
