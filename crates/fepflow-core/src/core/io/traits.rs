use crate::core::models::compound::CompoundSet;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading compound table formats.
///
/// Implementors turn a tabular or structural file into a [`CompoundSet`] whose
/// enumeration order follows the file.
pub trait CompoundFile {
    /// The error type for I/O and parsing failures.
    type Error: Error + From<io::Error>;

    /// Reads a compound set from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails, a required field is missing, or two entries
    /// share a name.
    fn read_from(reader: &mut impl BufRead) -> Result<CompoundSet, Self::Error>;

    /// Reads a compound set from a file path.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<CompoundSet, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
