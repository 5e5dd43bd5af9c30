// SPDX-License-Identifier: MIT OR Apache-2.0

//! Colored, human-readable console formatting.

use chrono::Local;
use serde_json::{Value, json};

use super::Formatter;
use crate::Level;
use crate::record::{Fields, Record};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const GREY: &str = "\x1b[90m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";

/// Formats records for humans: timestamp, colored level, logger name,
/// message, and a separate indented context block.
///
/// Scalar context fields share one bullet line; maps and arrays get their
/// own indented sub-blocks, nested values indented one step further per
/// level. Multiline messages continue under a `│` gutter so the block reads
/// as a unit. All ANSI styling can be switched off for dumb terminals or
/// captured output.
#[derive(Debug)]
pub struct PrettyFormatter {
    params: Fields,
    use_color: bool,
    show_logger_name: bool,
    context_indent: usize,
}

impl Default for PrettyFormatter {
    fn default() -> Self {
        PrettyFormatter {
            params: Fields::new(),
            use_color: true,
            show_logger_name: true,
            context_indent: 4,
        }
    }
}

impl PrettyFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a default parameter shown in every context block unless
    /// the record itself supplies the same key.
    pub fn with_param(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.params.insert(name.into(), default.into());
        self
    }

    /// Disables or re-enables ANSI styling.
    pub fn use_color(mut self, yes: bool) -> Self {
        self.use_color = yes;
        self
    }

    /// Hides or shows the logger name in the header.
    pub fn show_logger_name(mut self, yes: bool) -> Self {
        self.show_logger_name = yes;
        self
    }

    /// Indentation of the context block, in spaces.
    pub fn context_indent(mut self, spaces: usize) -> Self {
        self.context_indent = spaces;
        self
    }

    fn paint(&self, text: &str, color: Option<&str>, bold: bool, dim: bool) -> String {
        if !self.use_color {
            return text.to_string();
        }
        let mut codes = String::new();
        if bold {
            codes.push_str(BOLD);
        }
        if dim {
            codes.push_str(DIM);
        }
        if let Some(color) = color {
            codes.push_str(color);
        }
        if codes.is_empty() {
            text.to_string()
        } else {
            format!("{codes}{text}{RESET}")
        }
    }

    fn style_level(&self, level: Level) -> String {
        let color = match level {
            Level::Debug => CYAN,
            Level::Info => GREEN,
            Level::Warning => YELLOW,
            Level::Error => RED,
            Level::Critical => RED,
        };
        let bold = level >= Level::Warning;
        self.paint(level.as_str(), Some(color), bold, false)
    }

    fn style_time(&self, time: &str) -> String {
        self.paint(time, Some(GREY), false, true)
    }

    fn style_logger_name(&self, name: &str) -> String {
        self.paint(name, Some(BLUE), false, true)
    }

    fn style_key(&self, key: &str) -> String {
        self.paint(key, Some(GREY), true, false)
    }

    fn is_scalar(value: &Value) -> bool {
        matches!(
            value,
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
        )
    }

    /// Continuation lines of a multiline message sit under a `│` gutter
    /// aligned past the header.
    fn format_message_block(&self, header: &str, message: &str) -> String {
        if !message.contains('\n') {
            return format!("{header} {message}");
        }
        let mut lines = message.lines();
        let first = lines.next().unwrap_or_default();
        let gutter = format!(
            "{} {}",
            " ".repeat(header_width(header)),
            self.paint("│ ", Some(GREY), false, true)
        );
        let rest: Vec<String> = lines.map(|line| format!("{gutter}{line}")).collect();
        format!("{header} {first}\n{}", rest.join("\n"))
    }

    fn format_complex_value(&self, value: &Value, base_indent: &str, depth: usize) -> String {
        let indent = format!("{base_indent}{}", "  ".repeat(depth));
        let mut lines: Vec<String> = Vec::new();
        match value {
            Value::Object(map) => {
                for (key, item) in map {
                    let styled = self.style_key(key);
                    if Self::is_scalar(item) {
                        lines.push(format!("{indent}{styled}={item}"));
                    } else {
                        lines.push(format!("{indent}{styled}:"));
                        lines.push(self.format_complex_value(item, base_indent, depth + 1));
                    }
                }
            }
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    let styled = self.style_key(&format!("[{index}]"));
                    if Self::is_scalar(item) {
                        lines.push(format!("{indent}{styled}={item}"));
                    } else {
                        lines.push(format!("{indent}{styled}:"));
                        lines.push(self.format_complex_value(item, base_indent, depth + 1));
                    }
                }
            }
            scalar => lines.push(format!("{indent}{scalar}")),
        }
        lines.join("\n")
    }

    fn format_context_block(&self, context: &Fields) -> String {
        if context.is_empty() {
            return String::new();
        }
        let base_indent = " ".repeat(self.context_indent);
        let bullet = self.paint("└─", Some(GREY), false, true);

        let (scalars, complex): (Vec<_>, Vec<_>) = context
            .iter()
            .partition(|(_, value)| Self::is_scalar(value));

        let mut lines: Vec<String> = Vec::new();
        if scalars.is_empty() {
            lines.push(format!("{base_indent}{bullet}"));
        } else {
            let parts: Vec<String> = scalars
                .into_iter()
                .map(|(key, value)| format!("{}={value}", self.style_key(key)))
                .collect();
            lines.push(format!("{base_indent}{bullet} {}", parts.join(" ")));
        }
        for (key, value) in complex {
            lines.push(format!("{base_indent}   {}:", self.style_key(key)));
            lines.push(self.format_complex_value(value, &base_indent, 2));
        }
        format!("\n{}", lines.join("\n"))
    }
}

/// Display width of the header with ANSI escapes stripped.
fn header_width(header: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for ch in header.chars() {
        if in_escape {
            if ch == 'm' {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }
    width
}

impl Formatter for PrettyFormatter {
    fn format(&self, record: &Record) -> String {
        let time = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let mut parts = vec![
            self.style_time(&time),
            format!("[{}]", self.style_level(record.level())),
        ];
        if self.show_logger_name {
            parts.push(format!("{}:", self.style_logger_name(record.logger())));
        }
        let header = parts.join(" ");

        let mut context = self.params.clone();
        for (key, value) in record.fields() {
            context.insert(key.clone(), value.clone());
        }
        if let Some(exc) = record.exc() {
            context.insert(
                "exc".to_string(),
                json!({
                    "error_type": exc.error_type,
                    "error_value": exc.error_value,
                }),
            );
        }

        let mut formatted = self.format_message_block(&header, record.message());
        formatted.push_str(&self.format_context_block(&context));
        formatted
    }
}
