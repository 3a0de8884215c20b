//! Progress logging.
//!
//! The copy functions emit one line per copied key or node, formatted as `"{source} -> {destination}"`.
//! A [`ProgressLog`] selects where those lines go, and a [`LogWriter`] writes them for the duration of a copy.
//!
//! ### Example (log to stdout)
//! ```rust
//! # use zarrs_copy::{copy::{copy_store, CopyStoreOptions}, progress::ProgressLog, storage::store::MemoryStore};
//! let source = MemoryStore::new();
//! let dest = MemoryStore::new();
//! let mut stdout = std::io::stdout();
//! copy_store(&source, &dest, &CopyStoreOptions::new(), ProgressLog::writer(&mut stdout))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use crate::error::CopyError;

/// A progress line callback.
///
/// Returning an error aborts the copy.
pub type ProgressCallback<'a> = Box<dyn FnMut(&str) -> std::io::Result<()> + 'a>;

/// The target of progress lines.
#[derive(Default)]
pub enum ProgressLog<'a> {
    /// Do not log progress.
    #[default]
    None,
    /// Call a function with each line.
    Callback(ProgressCallback<'a>),
    /// Create a file at a path and write lines to it.
    ///
    /// The file is created when the copy starts and closed when it ends, including when the copy fails.
    Path(PathBuf),
    /// Write lines to a caller owned writer, which is flushed after every line but never closed.
    Writer(&'a mut dyn Write),
}

impl<'a> ProgressLog<'a> {
    /// Log progress with a callback.
    pub fn callback(callback: impl FnMut(&str) -> std::io::Result<()> + 'a) -> Self {
        Self::Callback(Box::new(callback))
    }

    /// Log progress to a new file at `path`.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Log progress to a caller owned writer.
    pub fn writer(writer: &'a mut dyn Write) -> Self {
        Self::Writer(writer)
    }
}

impl core::fmt::Debug for ProgressLog<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Callback(_) => write!(f, "Callback"),
            Self::Path(path) => write!(f, "Path({})", path.display()),
            Self::Writer(_) => write!(f, "Writer"),
        }
    }
}

enum Sink<'a> {
    None,
    Callback(ProgressCallback<'a>),
    Borrowed(&'a mut dyn Write),
    Owned(BufWriter<File>),
}

/// A scoped progress line writer.
///
/// A log file opened from a [`ProgressLog::Path`] is owned by the writer and closed when it is dropped.
/// Callbacks and caller supplied writers are never closed.
pub struct LogWriter<'a> {
    sink: Sink<'a>,
}

impl<'a> LogWriter<'a> {
    /// Create a new log writer, opening the log file if `log` is a [`ProgressLog::Path`].
    ///
    /// # Errors
    /// Returns [`CopyError::Progress`] if the log file cannot be created.
    pub fn new(log: ProgressLog<'a>) -> Result<Self, CopyError> {
        let sink = match log {
            ProgressLog::None => Sink::None,
            ProgressLog::Callback(callback) => Sink::Callback(callback),
            ProgressLog::Writer(writer) => Sink::Borrowed(writer),
            ProgressLog::Path(path) => {
                let file = File::create(&path).map_err(CopyError::Progress)?;
                tracing::debug!(path = %path.display(), "opened progress log");
                Sink::Owned(BufWriter::new(file))
            }
        };
        Ok(Self { sink })
    }

    /// Returns true if the writer owns its handle and will close it.
    #[must_use]
    pub fn owns_handle(&self) -> bool {
        matches!(self.sink, Sink::Owned(_))
    }

    /// Write a line.
    ///
    /// Writers are flushed after every line so that progress is visible if the copy stops early.
    ///
    /// # Errors
    /// Returns [`CopyError::Progress`] if the line cannot be written or the callback returns an error.
    pub fn log(&mut self, line: &str) -> Result<(), CopyError> {
        let result = match &mut self.sink {
            Sink::None => Ok(()),
            Sink::Callback(callback) => callback(line),
            Sink::Borrowed(writer) => write_line(&mut **writer, line),
            Sink::Owned(writer) => write_line(writer, line),
        };
        result.map_err(CopyError::Progress)
    }

    /// Log that `source` was copied to `destination`.
    ///
    /// # Errors
    /// Returns [`CopyError::Progress`] if the line cannot be written.
    pub fn log_copy(
        &mut self,
        source: impl std::fmt::Display,
        destination: impl std::fmt::Display,
    ) -> Result<(), CopyError> {
        self.log(&format!("{source} -> {destination}"))
    }
}

fn write_line(writer: &mut dyn Write, line: &str) -> std::io::Result<()> {
    writeln!(writer, "{line}")?;
    writer.flush()
}
