pub mod aggregate;
pub mod partition;
pub mod run;
pub mod topology;

use crate::error::{CliError, Result};
use fepflow::core::io::compounds::CsvCompoundTable;
use fepflow::core::io::traits::CompoundFile;
use fepflow::core::models::compound::CompoundSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Reads the compound table, attributing any failure to its path.
pub(crate) fn load_compounds(path: &Path) -> Result<CompoundSet> {
    info!("Loading compound table from {:?}", path);
    let compounds =
        CsvCompoundTable::read_from_path(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
    info!(compounds = compounds.len(), "Compound table loaded.");
    Ok(compounds)
}

/// The input's file stem, used to name derived outputs.
pub(crate) fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| CliError::Argument(format!("'{}' has no file name", path.display())))
}

pub(crate) fn output_in(dir: Option<&Path>, file_name: String) -> PathBuf {
    match dir {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}
