//! Output destinations for formatted lines: the console and the persisted file.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::format::stringify_extras;
use crate::severity::Style;

/// Console destination with optional colors and collapsible groups
pub struct Console {
    out: Box<dyn Write + Send>,
    color: bool,
    depth: usize,
}

impl Console {
    /// Console backed by stdout
    pub fn stdout(color: bool) -> Self {
        Self::new(Box::new(io::stdout()), color)
    }

    /// Console backed by an arbitrary writer
    pub fn new(out: Box<dyn Write + Send>, color: bool) -> Self {
        Self {
            out,
            color,
            depth: 0,
        }
    }

    /// Write one line, styled when colors are enabled, followed by `extras`
    pub fn write(
        &mut self,
        line: &str,
        style: Option<Style>,
        extras: &[serde_json::Value],
    ) -> io::Result<()> {
        let indent = "  ".repeat(self.depth);
        let text = match style {
            Some(style) if self.color => style.paint(line).to_string(),
            _ => line.to_string(),
        };
        writeln!(self.out, "{}{}{}", indent, text, stringify_extras(extras))
    }

    /// Open a collapsed group; following lines are indented
    pub fn group(&mut self) {
        self.depth += 1;
    }

    /// Close the innermost group
    pub fn group_end(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Append-only file that receives every emitted line
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileSink {
    /// Open `path` for appending, creating it if needed
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `line` and its stringified extras as one newline-terminated line
    pub fn append(&mut self, line: &str, extras: &[serde_json::Value]) -> io::Result<()> {
        writeln!(self.writer, "{}{}", line, stringify_extras(extras))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Flush buffered lines and sync them to disk
    pub fn close(mut self) -> io::Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()
    }
}

/// Cloneable in-memory writer for capturing console output
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
