//! Output module: the append-only email sink
//!
//! Each crawled email becomes one line in a text file. Every append is an
//! independent operation (open, write, close), so a failed write affects
//! only the follower being recorded at that moment.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Destination for crawled email addresses
pub trait Sink: Send + Sync {
    /// Appends one line; each call is independent of every other
    fn append(&self, line: &str) -> std::io::Result<()>;
}

/// Append-only text file sink
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Creates a sink writing to `path` (created on first append)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Sink for FileSink {
    fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }
}
