//! Provides file input/output for the pipeline's on-disk formats.
//!
//! Edge lists and result documents are JSON; compound tables are CSV. Every write of a
//! result document or edge list goes through [`write_atomically`], so a reader never
//! observes a half-written file even if the writing process is killed mid-save.

pub mod compounds;
pub mod document;
pub mod edges;
pub mod traits;

use crate::core::validation::ValidationError;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON error for '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("Invalid contents in '{path}': {source}")]
    Invalid {
        path: String,
        source: ValidationError,
    },
}

impl FileError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_string_lossy().to_string(),
            source,
        }
    }

    pub(crate) fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_string_lossy().to_string(),
            source,
        }
    }

    pub(crate) fn invalid(path: &Path, source: ValidationError) -> Self {
        Self::Invalid {
            path: path.to_string_lossy().to_string(),
            source,
        }
    }
}

/// Writes `path` by filling a temporary sibling file, syncing it to disk and renaming
/// it over the target.
pub fn write_atomically<F>(path: &Path, fill: F) -> Result<(), FileError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), FileError>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| FileError::io(path, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        fill(&mut writer)?;
        writer.flush().map_err(|e| FileError::io(path, e))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| FileError::io(path, e))?;
    tmp.persist(path).map_err(|e| FileError::io(path, e.error))?;
    Ok(())
}
