//! Leveled console logging with colorized output, optional persistence to a
//! file, and a call-tracing wrapper that times functions and logs their
//! arguments and results.
//!
//! A [`Logger`] is an explicit instance rather than process-wide state:
//!
//! ```no_run
//! use levelog::{Logger, Severity};
//!
//! let logger = Logger::new();
//! logger.level(Severity::Info);
//! logger.trace("filtered out");
//! logger.info("ready");
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

pub mod config;
pub mod format;
pub mod logger;
pub mod logging;
pub mod severity;
pub mod sink;
pub mod trace;

// Re-export key types
pub use config::Config;
pub use format::Record;
pub use logger::{Emit, FatalHandler, Logger, LoggerBuilder, FATAL_EXIT_CODE, FATAL_MESSAGE};
pub use severity::{Severity, Style};
pub use trace::{traced, Traced};

/// Custom error type for the library
#[derive(Debug)]
pub enum Error {
    /// Input/output error
    Io(std::io::Error),
    /// JSON serialization/deserialization error
    Json(serde_json::Error),
    /// Invalid parameter error
    InvalidParam(String),
    /// Persistence was requested while a stream is already open
    AlreadyPersisting(PathBuf),
    /// Another `log` backend was installed first
    LoggerInstalled(log::SetLoggerError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Json(err) => write!(f, "JSON error: {}", err),
            Error::InvalidParam(msg) => write!(f, "Invalid parameter: {}", msg),
            Error::AlreadyPersisting(path) => {
                write!(f, "Already persisting to {}", path.display())
            }
            Error::LoggerInstalled(err) => write!(f, "Logger already installed: {}", err),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::InvalidParam(_) => None,
            Error::AlreadyPersisting(_) => None,
            Error::LoggerInstalled(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

/// Type alias for library results
pub type Result<T> = std::result::Result<T, Error>;
