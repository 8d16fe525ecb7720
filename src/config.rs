//! Logger configuration loaded from JSON or the environment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::severity::Severity;
use crate::{Error, Result};

/// Environment variable naming the minimum severity
pub const ENV_LEVEL: &str = "LEVELOG_LEVEL";
/// Environment variable naming the persisted file
pub const ENV_FILE: &str = "LEVELOG_FILE";
/// Environment variable toggling call stacks on `error`/`critical`
pub const ENV_STACK: &str = "LEVELOG_STACK";
/// Any non-empty value disables colors
pub const ENV_NO_COLOR: &str = "NO_COLOR";

/// Settings used by [`crate::Logger::from_config`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Minimum severity
    #[serde(default)]
    pub level: Severity,

    /// File to persist lines to, opened at startup
    #[serde(default)]
    pub persist: Option<PathBuf>,

    /// Whether console lines are colorized
    #[serde(default = "default_true")]
    pub color: bool,

    /// Whether `error` and `critical` print the call stack
    #[serde(default = "default_true")]
    pub capture_stack: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: Severity::Trace,
            persist: None,
            color: true,
            capture_stack: true,
        }
    }
}

impl Config {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(level) = lookup(ENV_LEVEL) {
            config.level = level.parse()?;
        }
        if let Some(file) = lookup(ENV_FILE).filter(|f| !f.is_empty()) {
            config.persist = Some(PathBuf::from(file));
        }
        if lookup(ENV_NO_COLOR).is_some_and(|v| !v.is_empty()) {
            config.color = false;
        }
        if let Some(stack) = lookup(ENV_STACK) {
            config.capture_stack = parse_bool(ENV_STACK, &stack)?;
        }

        Ok(config)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::InvalidParam(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_json_defaults() -> Result<()> {
        let config = Config::from_json_str("{}")?;
        assert_eq!(config, Config::default());

        let config = Config::from_json_str(r#"{"level": "WARN", "persist": "app.log", "color": false}"#)?;
        assert_eq!(config.level, Severity::Warn);
        assert_eq!(config.persist, Some(PathBuf::from("app.log")));
        assert!(!config.color);
        assert!(config.capture_stack);
        Ok(())
    }

    #[test]
    fn test_json_rejects_unknown_level() {
        assert!(matches!(
            Config::from_json_str(r#"{"level": "LOUD"}"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_from_lookup() -> Result<()> {
        let config = Config::from_lookup(lookup(&[
            (ENV_LEVEL, "error"),
            (ENV_FILE, "out.log"),
            (ENV_NO_COLOR, "1"),
            (ENV_STACK, "off"),
        ]))?;

        assert_eq!(config.level, Severity::Error);
        assert_eq!(config.persist, Some(PathBuf::from("out.log")));
        assert!(!config.color);
        assert!(!config.capture_stack);
        Ok(())
    }

    #[test]
    fn test_from_lookup_empty_environment() -> Result<()> {
        let config = Config::from_lookup(lookup(&[(ENV_NO_COLOR, ""), (ENV_FILE, "")]))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_from_lookup_invalid_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[(ENV_LEVEL, "loud")])),
            Err(Error::InvalidParam(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(ENV_STACK, "maybe")])),
            Err(Error::InvalidParam(_))
        ));
    }
}
