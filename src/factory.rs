// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-call logger construction for services.
//!
//! Most services want the same thing: a named logger with a single stdout
//! handler and the formatter that fits where the process runs. [`get_logger`]
//! builds exactly that, so individual services never manage their own
//! logging configuration.

use std::sync::Arc;

use crate::format::{JsonFormatter, PrettyFormatter};
use crate::logger::Logger;
use crate::record::Fields;
use crate::stream_handler::StreamHandler;

/// Execution environment, selecting the output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Env {
    /// Structured JSON lines suitable for observability pipelines.
    Production,
    /// Human-friendly, colored console output.
    Development,
}

/// Returns a fully configured logger with a single stdout handler.
///
/// # Examples
///
/// ```
/// use scopewise::{Env, get_logger, fields};
///
/// let logger = get_logger("checkout.api", Env::Development);
/// logger.info_with("payment completed", fields! { "order_id" => "ABC-123" });
/// ```
pub fn get_logger(name: &str, env: Env) -> Logger {
    get_logger_with(name, env, Fields::new(), Fields::new())
}

/// [`get_logger`] with default formatter parameters and persistent logger
/// fields.
///
/// `formatter_params` become defaults the formatter emits with every
/// record; `logger_fields` become the logger's persistent context, nested
/// under its name.
pub fn get_logger_with(
    name: &str,
    env: Env,
    formatter_params: Fields,
    logger_fields: Fields,
) -> Logger {
    let handler = match env {
        Env::Production => {
            let mut formatter = JsonFormatter::new();
            for (key, value) in formatter_params {
                formatter = formatter.with_param(key, value);
            }
            StreamHandler::stdout(formatter)
        }
        Env::Development => {
            let mut formatter = PrettyFormatter::new();
            for (key, value) in formatter_params {
                formatter = formatter.with_param(key, value);
            }
            StreamHandler::stdout(formatter)
        }
    };
    Logger::builder()
        .name(name)
        .handler(Arc::new(handler))
        .fields(logger_fields)
        .build()
        .expect("the factory supplies every required field")
}
