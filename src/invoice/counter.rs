//! Sequential invoice number backed by a one-line text file.
//!
//! The file holds the next number to hand out. Reads and writes happen under
//! a process-wide lock and every write replaces the file atomically.

use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("failed to read counter file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write counter file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("counter file {path} contains {content:?}, expected a non-negative integer")]
    Corrupt { path: PathBuf, content: String },
    #[error("counter file {path} is exhausted at {value}")]
    Exhausted { path: PathBuf, value: u64 },
}

pub struct InvoiceCounter {
    path: PathBuf,
    lock: Mutex<()>,
}

impl InvoiceCounter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Take the next number. A missing or empty file starts at 1.
    pub fn next(&self) -> Result<u64, CounterError> {
        let _guard = self.lock.lock();
        let current = self.read_current()?;
        let next = current.checked_add(1).ok_or_else(|| CounterError::Exhausted {
            path: self.path.clone(),
            value: current,
        })?;
        self.store(next)?;
        Ok(current)
    }

    /// Number the next call to `next` would return, without taking it.
    pub fn peek(&self) -> Result<u64, CounterError> {
        let _guard = self.lock.lock();
        self.read_current()
    }

    fn read_current(&self) -> Result<u64, CounterError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(1),
            Err(source) => {
                return Err(CounterError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(1);
        }
        match trimmed.parse::<u64>() {
            Ok(value) => Ok(value),
            Err(_) => Err(CounterError::Corrupt {
                path: self.path.clone(),
                content: trimmed.to_string(),
            }),
        }
    }

    fn store(&self, value: u64) -> Result<(), CounterError> {
        let write_err = |source: std::io::Error| CounterError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(value.to_string().as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}
