// SPDX-License-Identifier: MIT OR Apache-2.0

//! The composed record handed to handlers.
//!
//! A [`Record`] is built fresh for every log call: the call's own fields sit
//! at the top level of the map, and the logger's accumulated context
//! (persistent fields plus any scoped sub-contexts active on the calling
//! thread) is nested under a single key equal to the logger's name. The
//! record is then passed to every attached handler and never retained.
//!
//! Timestamps are deliberately absent here: they are applied by the
//! formatter at output time, not by the composer.

use serde::Serialize;
use serde_json::Value;

use crate::Level;

/// A map of field names to structured values.
///
/// Used for call-site fields, persistent context, and scoped sub-contexts
/// alike. Build one with the [`fields!`](crate::fields) macro or directly
/// from `serde_json`.
pub type Fields = serde_json::Map<String, Value>;

/// Captured information about a failure, reduced to a stable pair.
///
/// `error_type` is the failure's category (the error's type name without its
/// module path), `error_value` its rendered description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcInfo {
    pub error_type: String,
    pub error_value: String,
}

impl ExcInfo {
    /// Captures a propagating error as a `(category, description)` pair.
    pub fn from_error<E: std::error::Error>(error: &E) -> Self {
        ExcInfo {
            error_type: short_type_name::<E>().to_string(),
            error_value: error.to_string(),
        }
    }

    pub(crate) fn from_panic() -> Self {
        ExcInfo {
            error_type: "panic".to_string(),
            error_value: "panic raised inside the scope body".to_string(),
        }
    }
}

/// Strips the module path (and any generic arguments) from a type name.
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// One composed log record.
///
/// Records are ephemeral: composed per call, cloned per handler, never
/// stored by the core. Handlers receive them by value and decide how to
/// render them (see [`Formatter`](crate::Formatter)).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    level: Level,
    logger: String,
    message: String,
    pub(crate) fields: Fields,
    pub(crate) exc: Option<ExcInfo>,
}

impl Record {
    pub(crate) fn new(level: Level, logger: String, message: String) -> Self {
        Record {
            level,
            logger,
            message,
            fields: Fields::new(),
            exc: None,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Name of the logger that composed this record. Doubles as the key the
    /// contextual namespace is nested under in [`fields`](Self::fields).
    pub fn logger(&self) -> &str {
        &self.logger
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Top-level fields: the call's own fields plus the nested context
    /// namespace under the logger's name.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn exc(&self) -> Option<&ExcInfo> {
        self.exc.as_ref()
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)?;
        if !self.fields.is_empty() {
            write!(f, " {}", Value::Object(self.fields.clone()))?;
        }
        if let Some(exc) = &self.exc {
            write!(f, " exc={}/{}", exc.error_type, exc.error_value)?;
        }
        Ok(())
    }
}

/*
Boilerplate notes for Record:

- Debug/Clone: derived; records are cloned once per attached handler.
- PartialEq: derived, useful in tests. Eq/Hash are skipped: the field map
  holds arbitrary JSON values and has no Hash.
- Default: skipped, a record without a level and logger name is meaningless.
- Display: implemented, used by the in-memory handler's drained form.
- Ord: no meaningful ordering.
*/
