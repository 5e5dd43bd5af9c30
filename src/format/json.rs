// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON line formatting.

use chrono::Utc;
use serde_json::{Value, json};

use super::Formatter;
use crate::record::{Fields, Record};

/// Formats each record as a single JSON object on one line.
///
/// The object always carries `level`, `time` (RFC 3339, applied here at
/// format time), and `message`, followed by the formatter's default
/// parameters and the record's own fields; the record wins on a key
/// collision. A captured failure is rendered under `exc`.
///
/// # Examples
///
/// ```
/// use scopewise::JsonFormatter;
///
/// let formatter = JsonFormatter::new()
///     .with_param("service", "checkout")
///     .with_param("env", "local");
/// ```
#[derive(Debug, Default)]
pub struct JsonFormatter {
    params: Fields,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a default parameter emitted with every record unless the
    /// record itself supplies the same key.
    pub fn with_param(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.params.insert(name.into(), default.into());
        self
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, record: &Record) -> String {
        let mut output = Fields::new();
        output.insert("level".to_string(), json!(record.level().as_str()));
        output.insert("time".to_string(), json!(Utc::now().to_rfc3339()));
        output.insert("message".to_string(), json!(record.message()));
        for (name, default) in &self.params {
            output.insert(name.clone(), default.clone());
        }
        for (key, value) in record.fields() {
            output.insert(key.clone(), value.clone());
        }
        if let Some(exc) = record.exc() {
            output.insert(
                "exc".to_string(),
                json!({
                    "error_type": exc.error_type,
                    "error_value": exc.error_value,
                }),
            );
        }
        Value::Object(output).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ExcInfo;
    use crate::Level;

    fn parsed(formatter: &JsonFormatter, record: &Record) -> Value {
        serde_json::from_str(&formatter.format(record)).expect("output is valid JSON")
    }

    fn record() -> Record {
        let mut record = Record::new(Level::Info, "payments".into(), "x".into());
        record.fields.insert("order_id".into(), json!("O1"));
        record
            .fields
            .insert("payments".into(), json!({"service": "payments"}));
        record
    }

    #[test]
    fn carries_level_time_message_and_fields() {
        let output = parsed(&JsonFormatter::new(), &record());
        assert_eq!(output["level"], "INFO");
        assert_eq!(output["message"], "x");
        assert_eq!(output["order_id"], "O1");
        assert_eq!(output["payments"]["service"], "payments");
        assert!(output["time"].is_string());
    }

    #[test]
    fn record_fields_override_default_params() {
        let formatter = JsonFormatter::new()
            .with_param("env", "local")
            .with_param("order_id", "unset");
        let output = parsed(&formatter, &record());
        assert_eq!(output["env"], "local");
        assert_eq!(output["order_id"], "O1");
    }

    #[test]
    fn captured_failures_render_under_exc() {
        let mut failing = record();
        failing.exc = Some(ExcInfo {
            error_type: "RefreshTimeout".into(),
            error_value: "refresh timed out".into(),
        });
        let output = parsed(&JsonFormatter::new(), &failing);
        assert_eq!(output["exc"]["error_type"], "RefreshTimeout");
        assert_eq!(output["exc"]["error_value"], "refresh timed out");
    }

    #[test]
    fn absent_exc_is_omitted() {
        let output = parsed(&JsonFormatter::new(), &record());
        assert!(output.get("exc").is_none());
    }
}
