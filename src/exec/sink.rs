// src/exec/sink.rs

//! Output destinations for component processes.
//!
//! - [`OutputSink::LogFile`]: one file per component, truncated before the
//!   batch starts and handed to the child as its stdout and stderr.
//! - [`OutputSink::ColorStream`]: line-prefixed, per-component colored output
//!   on a [`SharedStream`] that every component of the batch writes to.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use console::{Color, style};

/// Prefix colors, assigned round-robin by position in the batch.
pub const PREFIX_COLORS: [Color; 6] = [
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::Red,
];

/// Color for the component at `index` within its batch.
pub fn color_for(index: usize) -> Color {
    PREFIX_COLORS[index % PREFIX_COLORS.len()]
}

/// Width of the prefix column: the longest component name in the batch.
pub fn column_width<'a>(names: impl IntoIterator<Item = &'a str>) -> usize {
    names
        .into_iter()
        .map(|n| n.chars().count())
        .max()
        .unwrap_or(0)
}

/// A writer shared by all components of a batch.
///
/// Each call to [`SharedStream::write_line`] holds the lock for one whole
/// line, so lines from different components never interleave mid-line.
#[derive(Clone)]
pub struct SharedStream {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl SharedStream {
    pub fn stdout() -> Self {
        Self::from_writer(io::stdout())
    }

    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("shared output stream lock poisoned"))?;
        writeln!(guard, "{line}")?;
        guard.flush()
    }
}

impl fmt::Debug for SharedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedStream").finish_non_exhaustive()
    }
}

/// Interactive sink writing `<name padded to column width> | <line>`.
#[derive(Debug, Clone)]
pub struct ColorStream {
    component: String,
    column_width: usize,
    color: Color,
    stream: SharedStream,
}

impl ColorStream {
    pub fn new(
        component: impl Into<String>,
        column_width: usize,
        color: Color,
        stream: SharedStream,
    ) -> Self {
        Self {
            component: component.into(),
            column_width,
            color,
            stream,
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn column_width(&self) -> usize {
        self.column_width
    }

    /// Write one line of child output, prefixed and colored.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let padded = format!("{:<width$}", self.component, width = self.column_width);
        let prefix = style(padded).fg(self.color).bold();
        self.stream.write_line(&format!("{prefix} | {line}"))
    }
}

/// Destination of a component's combined stdout/stderr.
#[derive(Debug, Clone)]
pub enum OutputSink {
    LogFile(PathBuf),
    ColorStream(ColorStream),
}

impl OutputSink {
    pub fn log_file(path: impl Into<PathBuf>) -> Self {
        OutputSink::LogFile(path.into())
    }

    pub fn color_stream(
        component: impl Into<String>,
        column_width: usize,
        color: Color,
        stream: SharedStream,
    ) -> Self {
        OutputSink::ColorStream(ColorStream::new(component, column_width, color, stream))
    }

    /// Create or truncate the log file. Streams need no preparation.
    pub fn prepare(&self) -> io::Result<()> {
        match self {
            OutputSink::LogFile(path) => open_log_file(path).map(drop),
            OutputSink::ColorStream(_) => Ok(()),
        }
    }

    /// Short description for dry-run output and logs.
    pub fn describe(&self) -> String {
        match self {
            OutputSink::LogFile(path) => format!("log file {}", path.display()),
            OutputSink::ColorStream(s) => format!("stream (prefix '{}')", s.component()),
        }
    }
}

/// Create (or truncate) a component log file, creating its directory first.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    File::create(path)
}
