use super::traits::CompoundFile;
use crate::core::models::compound::{Compound, CompoundSet};
use crate::core::validation::ValidationError;
use std::io::{self, BufRead};
use thiserror::Error;

const NAME: &str = "name";
const STRUCTURE: &str = "structure";
const NUM_ATOMS: &str = "num_atoms";
const SCORE: &str = "score";

#[derive(Debug, Error)]
pub enum CompoundTableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A CSV compound table.
///
/// The header must contain `name`, `structure` and `num_atoms`. An optional `score`
/// column carries the external comparison score; every other column is stored as a
/// string property on the compound. Empty property cells are skipped.
pub struct CsvCompoundTable;

struct Columns {
    name: usize,
    structure: usize,
    num_atoms: usize,
    score: Option<usize>,
    properties: Vec<(usize, String)>,
}

impl Columns {
    fn from_header(header: &csv::StringRecord) -> Result<Self, ValidationError> {
        let find = |column: &'static str| {
            header
                .iter()
                .position(|h| h.trim() == column)
                .ok_or(ValidationError::MissingColumn(column))
        };
        let name = find(NAME)?;
        let structure = find(STRUCTURE)?;
        let num_atoms = find(NUM_ATOMS)?;
        let score = find(SCORE).ok();

        let properties = header
            .iter()
            .enumerate()
            .filter(|(i, _)| ![name, structure, num_atoms].contains(i) && Some(*i) != score)
            .map(|(i, h)| (i, h.trim().to_string()))
            .collect();

        Ok(Self {
            name,
            structure,
            num_atoms,
            score,
            properties,
        })
    }
}

fn cell(record: &csv::StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or("").trim()
}

impl CompoundFile for CsvCompoundTable {
    type Error = CompoundTableError;

    fn read_from(reader: &mut impl BufRead) -> Result<CompoundSet, Self::Error> {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let columns = Columns::from_header(csv_reader.headers()?)?;

        let mut set = CompoundSet::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row = row + 1;

            let name = cell(&record, columns.name);
            if name.is_empty() {
                return Err(ValidationError::InvalidColumnValue {
                    row,
                    column: NAME,
                    value: String::new(),
                }
                .into());
            }
            let raw_atoms = cell(&record, columns.num_atoms);
            let num_atoms =
                raw_atoms
                    .parse::<usize>()
                    .map_err(|_| ValidationError::InvalidColumnValue {
                        row,
                        column: NUM_ATOMS,
                        value: raw_atoms.to_string(),
                    })?;

            let mut compound = Compound::new(name, cell(&record, columns.structure), num_atoms);

            if let Some(index) = columns.score {
                let raw = cell(&record, index);
                if !raw.is_empty() {
                    let score =
                        raw.parse::<f64>()
                            .map_err(|_| ValidationError::InvalidColumnValue {
                                row,
                                column: SCORE,
                                value: raw.to_string(),
                            })?;
                    compound = compound.with_score(score);
                }
            }

            for (index, key) in &columns.properties {
                let value = cell(&record, *index);
                if !value.is_empty() {
                    compound.set_property(key.as_str(), value);
                }
            }

            set.insert(compound)?;
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(text: &str) -> Result<CompoundSet, CompoundTableError> {
        CsvCompoundTable::read_from(&mut Cursor::new(text.as_bytes()))
    }

    #[test]
    fn reads_required_columns_score_and_properties_in_file_order() {
        let set = read(
            "name,structure,num_atoms,score,series\n\
             ligB,CCO,9,-7.5,alpha\n\
             ligA,CCN,10,,\n",
        )
        .unwrap();

        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["ligB", "ligA"]);

        let b = set.get("ligB").unwrap();
        assert_eq!(b.structure, "CCO");
        assert_eq!(b.num_atoms, 9);
        assert_eq!(b.score, Some(-7.5));
        assert_eq!(b.property("series"), Some("alpha"));

        let a = set.get("ligA").unwrap();
        assert_eq!(a.score, None);
        assert_eq!(a.property("series"), None);
    }

    #[test]
    fn missing_required_column_is_rejected() {
        let err = read("name,structure\nligA,CCO\n").unwrap_err();
        assert!(matches!(
            err,
            CompoundTableError::Invalid(ValidationError::MissingColumn("num_atoms"))
        ));
    }

    #[test]
    fn non_numeric_atom_count_reports_row_and_value() {
        let err = read("name,structure,num_atoms\nligA,CCO,many\n").unwrap_err();
        match err {
            CompoundTableError::Invalid(ValidationError::InvalidColumnValue {
                row,
                column,
                value,
            }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "num_atoms");
                assert_eq!(value, "many");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = read("name,structure,num_atoms\nligA,CCO,9\nligA,CCN,10\n").unwrap_err();
        assert!(matches!(
            err,
            CompoundTableError::Invalid(ValidationError::DuplicateCompound(name)) if name == "ligA"
        ));
    }

    #[test]
    fn reads_table_from_path_and_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compounds.csv");
        std::fs::write(&path, "name,structure,num_atoms\nhub,c1ccccc1,12\n").unwrap();

        let set = CsvCompoundTable::read_from_path(&path).unwrap();
        assert_eq!(set.get("hub").unwrap().num_atoms, 12);

        let err = CsvCompoundTable::read_from_path(dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, CompoundTableError::Io(_)));
    }
}
