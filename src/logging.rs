//! Bridge from the `log` crate macros to a [`Logger`]
//!
//! Once installed with [`init`], `log::info!` and friends are formatted and
//! persisted like direct calls, with the record target as the source tag.

use std::sync::Arc;

use crate::format::Record;
use crate::logger::Logger;
use crate::severity::Severity;
use crate::{Error, Result};

/// `log::Log` implementation that forwards records to a [`Logger`]
pub struct LogBridge {
    logger: Arc<Logger>,
}

impl LogBridge {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.logger.require_level(Severity::from(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let record = Record::new(record.args().to_string(), Severity::from(record.level()))
            .with_source(record.target());
        self.logger.log_record(&record);
    }

    fn flush(&self) {
        // Flushing is best effort; `log::Log::flush` has no error channel
        let _ = self.logger.flush();
    }
}

/// Install `logger` as the backend of the `log` macros
///
/// The `log` max level is left fully open so that [`Logger::level`] changes
/// apply to bridged records too; [`LogBridge`] does the filtering. Fails if
/// another `log` backend is already installed.
pub fn init(logger: Arc<Logger>) -> Result<()> {
    log::set_boxed_logger(Box::new(LogBridge::new(logger))).map_err(Error::LoggerInstalled)?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}

// Re-export the log crate and its macros
pub use log::{debug, error, info, trace, warn, LevelFilter};
