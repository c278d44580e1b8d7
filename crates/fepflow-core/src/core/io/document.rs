use super::{FileError, write_atomically};
use crate::core::models::document::ResultDocument;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

impl ResultDocument {
    pub fn read_from_path(path: &Path) -> Result<Self, FileError> {
        let file = File::open(path).map_err(|e| FileError::io(path, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| FileError::json(path, e))
    }

    /// Atomically replaces the file at `path` with this document as 2-space pretty JSON.
    pub fn write_to_path(&self, path: &Path) -> Result<(), FileError> {
        write_atomically(path, |writer| {
            serde_json::to_writer_pretty(&mut *writer, self)
                .map_err(|e| FileError::json(path, e))?;
            writer.write_all(b"\n").map_err(|e| FileError::io(path, e))
        })
    }
}
