use super::error::EngineError;
use crate::core::io::FileError;
use crate::core::models::document::{ResultDocument, Upsert};
use crate::core::models::edge::{Edge, EdgeRecord};
use crate::core::models::params::RunParams;
use std::ffi::OsString;
use std::fs::{File, OpenOptions, TryLockError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A result document bound to its file on disk.
///
/// The store holds an exclusive advisory lock on `<path>.lock` for as long as it lives,
/// so two drivers can never interleave writes to one document. Every mutation is
/// persisted before the call returns.
#[derive(Debug)]
pub struct ResultStore {
    path: PathBuf,
    document: ResultDocument,
    _lock: File,
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}

fn acquire_lock(path: &Path) -> Result<File, EngineError> {
    let lock_path = lock_path(path);
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(|e| FileError::io(&lock_path, e))?;
    match file.try_lock() {
        Ok(()) => Ok(file),
        Err(TryLockError::WouldBlock) => Err(EngineError::StoreLocked {
            path: path.to_string_lossy().to_string(),
        }),
        Err(TryLockError::Error(e)) => Err(FileError::io(&lock_path, e).into()),
    }
}

impl ResultStore {
    /// Opens the document at `path`, or creates it carrying `requested`.
    ///
    /// An existing document must have been written with exactly the requested
    /// parameters. A new document is persisted before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::StoreLocked`] if another store owns `path` and
    /// [`EngineError::ConfigConsistency`] naming the first differing field if the stored
    /// parameters disagree with `requested`.
    pub fn load_or_init(path: &Path, requested: &RunParams) -> Result<Self, EngineError> {
        let lock = acquire_lock(path)?;

        let document = if path.exists() {
            let document = ResultDocument::read_from_path(path)?;
            if let Some(mismatch) = document.params().first_mismatch(requested) {
                return Err(EngineError::ConfigConsistency {
                    path: path.to_string_lossy().to_string(),
                    field: mismatch.field,
                    stored: mismatch.stored,
                    requested: mismatch.requested,
                });
            }
            info!(
                path = %path.display(),
                edges = document.len(),
                "Resuming existing result document"
            );
            document
        } else {
            let document = ResultDocument::new(requested.clone());
            document.write_to_path(path)?;
            info!(path = %path.display(), "Initialized new result document");
            document
        };

        Ok(Self {
            path: path.to_path_buf(),
            document,
            _lock: lock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &ResultDocument {
        &self.document
    }

    pub fn params(&self) -> &RunParams {
        self.document.params()
    }

    pub fn record(&self, edge: &Edge) -> Option<&EdgeRecord> {
        self.document.get(edge)
    }

    /// Inserts or replaces `record` and persists the whole document.
    pub fn upsert(&mut self, record: EdgeRecord) -> Result<Upsert, EngineError> {
        let outcome = self.document.upsert(record);
        self.persist()?;
        debug!(position = outcome.position(), ?outcome, "Persisted edge record");
        Ok(outcome)
    }

    fn persist(&self) -> Result<(), EngineError> {
        self.document.write_to_path(&self.path)?;
        Ok(())
    }
}
