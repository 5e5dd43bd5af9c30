// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call-wrapping helpers: log a callable's entry, arguments, and failures.
//!
//! Both helpers take the argument map from the caller at call time; the
//! wrapped callable receives the same map, so the values logged are the
//! values used.

use crate::logger::Logger;
use crate::record::Fields;

/// Wraps `func` so that every call first logs `func <name> called` with the
/// supplied arguments under a top-level `args` field.
///
/// # Examples
///
/// ```
/// use scopewise::{InMemoryHandler, Logger, fields, loggable};
/// use std::sync::Arc;
///
/// let handler = Arc::new(InMemoryHandler::new());
/// let logger = Logger::builder()
///     .name("math")
///     .handler(handler.clone())
///     .build()
///     .unwrap();
///
/// let double = loggable(&logger, "double", |args| {
///     args["n"].as_i64().unwrap_or_default() * 2
/// });
/// assert_eq!(double(fields! { "n" => 21 }), 42);
///
/// let record = handler.drain_records().pop().unwrap();
/// assert_eq!(record.message(), "func double called");
/// assert_eq!(record.fields()["args"]["n"], 21);
/// ```
pub fn loggable<'a, T, F>(
    logger: &'a Logger,
    function_name: impl Into<String>,
    func: F,
) -> impl Fn(Fields) -> T + 'a
where
    F: Fn(&Fields) -> T + 'a,
{
    let function_name = function_name.into();
    move |args: Fields| {
        logger.info_with(
            &format!("func {function_name} called"),
            crate::fields! { "args" => args.clone() },
        );
        func(&args)
    }
}

/// Wraps a fallible `func` so that a failure is logged with the function
/// name and arguments before it is handled or re-raised.
///
/// On `Err(e)` the wrapper emits an ERROR record whose message is `e`'s
/// rendering, with top-level `function_name` and `args` fields. When
/// `handle_error` is `true` the error is consumed and the call returns
/// `Ok(None)`; otherwise the error is returned to the caller. Successful
/// calls log nothing.
pub fn error_logs<'a, T, E, F>(
    logger: &'a Logger,
    function_name: impl Into<String>,
    handle_error: bool,
    func: F,
) -> impl Fn(Fields) -> Result<Option<T>, E> + 'a
where
    F: Fn(&Fields) -> Result<T, E> + 'a,
    E: std::error::Error,
{
    let function_name = function_name.into();
    move |args: Fields| match func(&args) {
        Ok(value) => Ok(Some(value)),
        Err(error) => {
            logger.error_with(
                &error.to_string(),
                crate::fields! {
                    "function_name" => function_name.clone(),
                    "args" => args.clone(),
                },
            );
            if handle_error { Ok(None) } else { Err(error) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_handler::InMemoryHandler;
    use crate::registry::GLOBAL_STATE_GUARD;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Debug, thiserror::Error)]
    #[error("division by zero")]
    struct DivisionByZero;

    fn capture() -> (Arc<InMemoryHandler>, Logger) {
        let handler = Arc::new(InMemoryHandler::new());
        let logger = Logger::builder()
            .name("math")
            .handler(handler.clone())
            .build()
            .expect("complete configuration");
        (handler, logger)
    }

    #[test]
    fn loggable_logs_entry_with_args() {
        let _guard = GLOBAL_STATE_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let (handler, logger) = capture();

        let double = loggable(&logger, "double", |args: &Fields| {
            args["n"].as_i64().unwrap_or_default() * 2
        });
        assert_eq!(double(crate::fields! { "n" => 4 }), 8);

        let record = handler.drain_records().pop().expect("one record");
        assert_eq!(record.message(), "func double called");
        assert_eq!(record.fields()["args"], json!({"n": 4}));
    }

    #[test]
    fn error_logs_is_silent_on_success() {
        let _guard = GLOBAL_STATE_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let (handler, logger) = capture();

        let divide = error_logs(&logger, "divide", true, |args: &Fields| {
            let d = args["d"].as_i64().unwrap_or_default();
            if d == 0 {
                Err(DivisionByZero)
            } else {
                Ok(100 / d)
            }
        });

        assert_eq!(divide(crate::fields! { "d" => 4 }).unwrap(), Some(25));
        assert!(handler.drain_records().is_empty());
    }

    #[test]
    fn error_logs_records_failures_with_function_name_and_args() {
        let _guard = GLOBAL_STATE_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let (handler, logger) = capture();

        let divide = error_logs(&logger, "divide", true, |args: &Fields| {
            let d = args["d"].as_i64().unwrap_or_default();
            if d == 0 {
                Err(DivisionByZero)
            } else {
                Ok(100 / d)
            }
        });

        assert_eq!(divide(crate::fields! { "d" => 0 }).unwrap(), None);

        let record = handler.drain_records().pop().expect("one record");
        assert_eq!(record.message(), "division by zero");
        assert_eq!(record.fields()["function_name"], json!("divide"));
        assert_eq!(record.fields()["args"]["d"], json!(0));
    }

    #[test]
    fn unhandled_failures_are_returned_to_the_caller() {
        let _guard = GLOBAL_STATE_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        let (handler, logger) = capture();

        let divide = error_logs(&logger, "divide", false, |args: &Fields| {
            let d = args["d"].as_i64().unwrap_or_default();
            if d == 0 {
                Err(DivisionByZero)
            } else {
                Ok(100 / d)
            }
        });

        assert!(divide(crate::fields! { "d" => 0 }).is_err());
        assert_eq!(handler.drain_records().len(), 1);
    }
}
