//! Severity levels and their console styles.

use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Ordered log severity. Smaller is more verbose; `Off` suppresses everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Severity {
    #[serde(alias = "trace")]
    Trace = 0,
    #[serde(alias = "info")]
    Info = 1,
    #[serde(alias = "warn")]
    Warn = 2,
    #[serde(alias = "error")]
    Error = 3,
    #[serde(alias = "critical")]
    Critical = 4,
    #[serde(alias = "off")]
    Off = 5,
}

impl Default for Severity {
    fn default() -> Self {
        Self::Trace
    }
}

impl Severity {
    /// Every severity, most verbose first
    pub const ALL: [Severity; 6] = [
        Severity::Trace,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Critical,
        Severity::Off,
    ];

    /// Upper-case label used in formatted lines and default file names
    pub fn label(self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
            Severity::Off => "OFF",
        }
    }

    /// Console style for lines emitted at this severity
    pub fn style(self) -> Style {
        match self {
            Severity::Trace => Style::Bright,
            Severity::Info => Style::Green,
            Severity::Warn => Style::Yellow,
            Severity::Error => Style::Red,
            _ => Style::Inverted,
        }
    }

    pub(crate) fn from_u8(value: u8) -> Self {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .unwrap_or(Severity::Off)
    }

    /// The `log` crate filter that lets through exactly what this severity allows
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Severity::Trace => log::LevelFilter::Trace,
            Severity::Info => log::LevelFilter::Info,
            Severity::Warn => log::LevelFilter::Warn,
            Severity::Error | Severity::Critical => log::LevelFilter::Error,
            Severity::Off => log::LevelFilter::Off,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|severity| severity.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidParam(format!("Unknown severity: {}", s)))
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warn,
            log::Level::Info => Severity::Info,
            log::Level::Debug | log::Level::Trace => Severity::Trace,
        }
    }
}

/// Console presentation for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Bright white
    Bright,
    Green,
    Yellow,
    Red,
    /// Bright white on red
    Inverted,
}

impl Style {
    /// Apply the style to `text`
    pub fn paint(self, text: &str) -> ColoredString {
        match self {
            Style::Bright => text.bright_white(),
            Style::Green => text.green(),
            Style::Yellow => text.yellow(),
            Style::Red => text.red(),
            Style::Inverted => text.bright_white().on_red(),
        }
    }
}
