//! Line formatting for log records.

use chrono::{DateTime, Local};

use crate::severity::Severity;

/// Fixed width of the time column
pub const TIME_LENGTH: usize = 11;

/// Fixed width of the severity label column
pub const MAX_PAD: usize = 8;

/// A single log call, built per call and consumed immediately
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Text to log
    pub message: String,
    /// Severity the record is emitted at
    pub severity: Severity,
    /// Optional tag naming where the record came from
    pub source: Option<String>,
}

impl Record {
    /// Create a record without a source tag
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            source: None,
        }
    }

    /// Attach a source tag
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Short local time, e.g. `3:04:05 PM`
pub fn format_time(time: &DateTime<Local>) -> String {
    time.format("%-I:%M:%S %p").to_string()
}

/// Build the display line for `record` stamped with `time`.
///
/// Columns are padded, never truncated: a time longer than [`TIME_LENGTH`]
/// simply gets no padding.
pub fn format_line(time: &str, record: &Record) -> String {
    let time_pad = " ".repeat(TIME_LENGTH.saturating_sub(time.chars().count()));
    let label = record.severity.label();
    let pad = " ".repeat(MAX_PAD.saturating_sub(label.len()));

    let mut line = format!("[{}]{} [{}] {} {} ", time, time_pad, label, pad, record.message);
    if let Some(source) = record.source.as_deref().filter(|s| !s.is_empty()) {
        line.push_str(&format!(" - [{}]", source));
    }
    line
}

/// Render auxiliary values as they are appended to persisted lines
pub fn stringify_extras(extras: &[serde_json::Value]) -> String {
    extras
        .iter()
        .map(|value| format!(" {}", value))
        .collect()
}
