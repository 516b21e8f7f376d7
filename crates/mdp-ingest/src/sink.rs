//! Append-only CSV record log

use crate::models::Record;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors from record persistence. Message-fatal: the orchestrator must not
/// advance the checkpoint past a record that failed to append.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Append-only writer for the record log.
///
/// The header row is written exactly once, when the log file is created;
/// reopening an existing log never rewrites it. Existing rows are never
/// touched.
pub struct CsvRecordSink {
    path: PathBuf,
    writer: csv::Writer<fs::File>,
}

impl CsvRecordSink {
    /// Open the log for appending, creating it (and its parent directory)
    /// if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WriteError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let is_new = match fs::metadata(&path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);

        debug!(path = %path.display(), is_new, "record log opened");
        Ok(Self { path, writer })
    }

    /// Append one record and flush it to the OS before returning.
    ///
    /// A row acknowledged here is on its way to durable storage; a failure
    /// leaves the log without the row and the caller must not advance the
    /// channel checkpoint.
    pub fn append(&mut self, record: &Record) -> Result<(), WriteError> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Path of the backing log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
