//! The leveled logging facade.
//!
//! A [`Logger`] owns the minimum severity, the console, and at most one
//! persisted output file. Every emission path funnels through
//! [`Logger::log_and_persist`], the only place that touches the console and
//! the file.

use chrono::Local;
use figlet_rs::FIGfont;
use std::backtrace::Backtrace;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::config::Config;
use crate::format::{format_line, format_time, Record};
use crate::severity::{Severity, Style};
use crate::sink::{Console, FileSink};
use crate::{Error, Result};

/// Second line emitted by [`Logger::critical`]
pub const FATAL_MESSAGE: &str = "This is a fatal error. Terminating Process.";

/// Exit status handed to the fatal handler
pub const FATAL_EXIT_CODE: i32 = 1;

/// Extension of default persisted file names
pub const LOG_EXTENSION: &str = "log";

/// Called by [`Logger::critical`] once output has been flushed
pub type FatalHandler = Box<dyn Fn(i32) + Send + Sync>;

/// Options for [`Logger::log_and_persist`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Emit {
    /// Console style; `None` writes the line uncolored
    pub style: Option<Style>,
    /// Auxiliary values written after the line
    pub extras: Vec<serde_json::Value>,
}

impl Emit {
    pub fn styled(style: Style) -> Self {
        Self {
            style: Some(style),
            extras: Vec::new(),
        }
    }

    pub fn with_extra(mut self, extra: serde_json::Value) -> Self {
        self.extras.push(extra);
        self
    }
}

/// Persistence lifecycle. Once opened it never returns to `Unopened`.
enum Persistence {
    Unopened,
    Open(FileSink),
    Closed(PathBuf),
}

impl Persistence {
    fn path(&self) -> Option<PathBuf> {
        match self {
            Persistence::Open(sink) => Some(sink.path().to_path_buf()),
            Persistence::Closed(path) => Some(path.clone()),
            Persistence::Unopened => None,
        }
    }
}

struct State {
    console: Console,
    persistence: Persistence,
}

/// Leveled logger writing to the console and, optionally, a file
pub struct Logger {
    min_severity: AtomicU8,
    state: Mutex<State>,
    capture_stack: bool,
    on_fatal: FatalHandler,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Logger at `TRACE` writing colorized lines to stdout
    pub fn new() -> Self {
        Self::builder().assemble().0
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Build a logger from `config`, opening the persisted file if one is named
    pub fn from_config(config: Config) -> Result<Self> {
        let mut builder = Self::builder()
            .level(config.level)
            .color(config.color)
            .capture_stack(config.capture_stack);
        if let Some(path) = config.persist {
            builder = builder.persist(path);
        }
        builder.build()
    }

    /// Set the minimum severity for all subsequent calls
    pub fn level(&self, severity: Severity) {
        self.min_severity.store(severity as u8, Ordering::Relaxed);
    }

    /// Current minimum severity
    pub fn severity(&self) -> Severity {
        Severity::from_u8(self.min_severity.load(Ordering::Relaxed))
    }

    /// Whether a record at `severity` passes the current filter
    pub fn require_level(&self, severity: Severity) -> bool {
        severity >= self.severity()
    }

    pub fn trace(&self, message: &str) {
        self.log_record(&Record::new(message, Severity::Trace));
    }

    pub fn info(&self, message: &str) {
        self.log_record(&Record::new(message, Severity::Info));
    }

    pub fn warn(&self, message: &str) {
        self.log_record(&Record::new(message, Severity::Warn));
    }

    /// Log at `ERROR` followed by the current call stack. Does not terminate.
    pub fn error(&self, message: &str) {
        if !self.log_record(&Record::new(message, Severity::Error)) {
            return;
        }
        self.emit_stack(Style::Red);
    }

    /// Log at `CRITICAL`, announce termination, print the call stack, close
    /// the persisted file, then hand [`FATAL_EXIT_CODE`] to the fatal handler.
    ///
    /// The default handler exits the process; the file is always flushed and
    /// synced before it runs.
    pub fn critical(&self, message: &str) {
        if !self.log_record(&Record::new(message, Severity::Critical)) {
            return;
        }
        self.emit(&Record::new(FATAL_MESSAGE, Severity::Critical));
        self.emit_stack(Style::Inverted);

        let closing = {
            let mut state = self.state();
            match std::mem::replace(&mut state.persistence, Persistence::Unopened) {
                Persistence::Open(sink) => {
                    state.persistence = Persistence::Closed(sink.path().to_path_buf());
                    Some(sink)
                }
                other => {
                    state.persistence = other;
                    None
                }
            }
        };
        if let Some(sink) = closing {
            report(sink.close().map_err(Error::from));
        }
        report(self.flush());

        (self.on_fatal)(FATAL_EXIT_CODE);
    }

    /// Log at a caller-chosen severity, still subject to the filter
    pub fn dynamic_log(&self, message: &str, severity: Severity) {
        self.log_record(&Record::new(message, severity));
    }

    /// Filter, format and emit `record`. Returns whether it was emitted.
    ///
    /// Records at [`Severity::Off`] are never emitted.
    pub fn log_record(&self, record: &Record) -> bool {
        if record.severity == Severity::Off || !self.require_level(record.severity) {
            return false;
        }
        self.emit(record);
        true
    }

    /// Start persisting every emitted line to `file_name`, or to
    /// `<SEVERITY>.log` named after the current minimum severity.
    ///
    /// Only one file may ever be opened. A second request leaves the original
    /// file untouched, reports the misuse at `ERROR` and returns
    /// [`Error::AlreadyPersisting`].
    pub fn persist(&self, file_name: Option<&Path>) -> Result<PathBuf> {
        let path = {
            let mut state = self.state();
            match state.persistence.path() {
                Some(existing) => existing,
                None => {
                    let path = file_name
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.default_file_name());
                    state.persistence = Persistence::Open(FileSink::open(&path)?);
                    return Ok(path);
                }
            }
        };

        self.error(&format!(
            "Persistence is already active at {}; ignoring request",
            path.display()
        ));
        Err(Error::AlreadyPersisting(path))
    }

    /// Path of the persisted file, if persistence was ever activated
    pub fn persisted_path(&self) -> Option<PathBuf> {
        self.state().persistence.path()
    }

    /// Append `message` to the persisted file, if any, then write it to the
    /// console. Bypasses the severity filter.
    ///
    /// The console write happens even when the file append fails; the first
    /// error is returned.
    pub fn log_and_persist(&self, message: &str, emit: Emit) -> Result<()> {
        let mut state = self.state();
        let persisted = match &mut state.persistence {
            Persistence::Open(sink) => sink.append(message, &emit.extras),
            _ => Ok(()),
        };
        let printed = state.console.write(message, emit.style, &emit.extras);
        persisted.and(printed)?;
        Ok(())
    }

    /// Emit `text` as a large banner regardless of the severity filter
    pub fn block(&self, text: &str, style: Option<Style>) {
        let banner = render_banner(text);
        report(self.log_and_persist(&banner, Emit::styled(style.unwrap_or(Style::Bright))));
    }

    /// Open a collapsed console group
    pub fn group(&self) {
        self.state().console.group();
    }

    pub fn group_end(&self) {
        self.state().console.group_end();
    }

    /// Flush the console and the persisted file
    pub fn flush(&self) -> Result<()> {
        let mut state = self.state();
        if let Persistence::Open(sink) = &mut state.persistence {
            sink.flush()?;
        }
        state.console.flush()?;
        Ok(())
    }

    /// Format and emit `record` without consulting the filter
    pub(crate) fn emit(&self, record: &Record) {
        let line = format_line(&format_time(&Local::now()), record);
        report(self.log_and_persist(&line, Emit::styled(record.severity.style())));
    }

    fn emit_stack(&self, style: Style) {
        if !self.capture_stack {
            return;
        }
        let stack = Backtrace::force_capture().to_string();
        report(self.log_and_persist(stack.trim_end(), Emit::styled(style)));
    }

    fn default_file_name(&self) -> PathBuf {
        PathBuf::from(format!("{}.{}", self.severity().label(), LOG_EXTENSION))
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Builder for [`Logger`]
pub struct LoggerBuilder {
    level: Severity,
    color: bool,
    capture_stack: bool,
    console: Option<Box<dyn Write + Send>>,
    on_fatal: Option<FatalHandler>,
    persist: Option<PathBuf>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            level: Severity::Trace,
            color: true,
            capture_stack: true,
            console: None,
            on_fatal: None,
            persist: None,
        }
    }
}

impl LoggerBuilder {
    pub fn level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    /// Whether console lines are colorized
    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Whether `error` and `critical` print the call stack
    pub fn capture_stack(mut self, capture_stack: bool) -> Self {
        self.capture_stack = capture_stack;
        self
    }

    /// Write console output to `out` instead of stdout
    pub fn console(mut self, out: impl Write + Send + 'static) -> Self {
        self.console = Some(Box::new(out));
        self
    }

    /// Replace the default process exit performed by `critical`
    pub fn on_fatal(mut self, handler: impl Fn(i32) + Send + Sync + 'static) -> Self {
        self.on_fatal = Some(Box::new(handler));
        self
    }

    /// Persist to `path` from the start
    pub fn persist(mut self, path: impl Into<PathBuf>) -> Self {
        self.persist = Some(path.into());
        self
    }

    /// Build the logger, opening the persisted file if one was requested
    pub fn build(self) -> Result<Logger> {
        let (logger, persist) = self.assemble();
        if let Some(path) = persist {
            logger.persist(Some(&path))?;
        }
        Ok(logger)
    }

    fn assemble(self) -> (Logger, Option<PathBuf>) {
        let console = match self.console {
            Some(out) => Console::new(out, self.color),
            None => Console::stdout(self.color),
        };
        let logger = Logger {
            min_severity: AtomicU8::new(self.level as u8),
            state: Mutex::new(State {
                console,
                persistence: Persistence::Unopened,
            }),
            capture_stack: self.capture_stack,
            on_fatal: self
                .on_fatal
                .unwrap_or_else(|| Box::new(|code| std::process::exit(code))),
        };
        (logger, self.persist)
    }
}

fn render_banner(text: &str) -> String {
    FIGfont::standard()
        .ok()
        .and_then(|font| font.convert(text).map(|figure| figure.to_string()))
        .map(|banner| banner.trim_end_matches('\n').to_string())
        .unwrap_or_else(|| text.to_string())
}

/// Log emission never fails the caller; write errors go to stderr instead.
fn report(result: Result<()>) {
    if let Err(err) = result {
        eprintln!("levelog: failed to emit log line: {}", err);
    }
}
