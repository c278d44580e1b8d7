use super::{FileError, write_atomically};
use crate::core::models::edge::Edge;
use crate::core::validation::ValidationError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EdgeListError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Parses and validates an edge list from JSON text.
///
/// The list must be non-empty, every entry must hold exactly two names and no entry may
/// connect a compound to itself.
pub fn parse_edge_list(reader: impl Read) -> Result<Vec<Edge>, EdgeListError> {
    let raw: Vec<Vec<String>> = serde_json::from_reader(reader)?;
    Ok(validate_entries(raw)?)
}

fn validate_entries(raw: Vec<Vec<String>>) -> Result<Vec<Edge>, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::EmptyEdgeList);
    }
    raw.into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let len = entry.len();
            let [mol_a, mol_b]: [String; 2] = entry
                .try_into()
                .map_err(|_| ValidationError::NotAPair { index, len })?;
            if mol_a == mol_b {
                return Err(ValidationError::SelfEdge { index, name: mol_a });
            }
            Ok(Edge::new(mol_a, mol_b))
        })
        .collect()
}

pub fn read_edge_list(path: &Path) -> Result<Vec<Edge>, FileError> {
    let file = File::open(path).map_err(|e| FileError::io(path, e))?;
    parse_edge_list(BufReader::new(file)).map_err(|e| match e {
        EdgeListError::Json(e) => FileError::json(path, e),
        EdgeListError::Invalid(e) => FileError::invalid(path, e),
    })
}

/// Writes `edges` as a pretty-printed JSON array of `[mol_a, mol_b]` pairs.
pub fn write_edge_list(path: &Path, edges: &[Edge]) -> Result<(), FileError> {
    write_atomically(path, |writer| {
        serde_json::to_writer_pretty(&mut *writer, edges).map_err(|e| FileError::json(path, e))?;
        writer
            .write_all(b"\n")
            .map_err(|e| FileError::io(path, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(text: &str) -> Result<Vec<Edge>, ValidationError> {
        match parse_edge_list(text.as_bytes()) {
            Ok(edges) => Ok(edges),
            Err(EdgeListError::Invalid(e)) => Err(e),
            Err(EdgeListError::Json(e)) => panic!("unexpected JSON error: {e}"),
        }
    }

    #[test]
    fn parses_pairs_in_order() {
        let edges = parse(r#"[["A","B"],["A","C"]]"#).unwrap();
        assert_eq!(edges, vec![Edge::new("A", "B"), Edge::new("A", "C")]);
    }

    #[test]
    fn empty_list_is_rejected() {
        assert_eq!(parse("[]"), Err(ValidationError::EmptyEdgeList));
    }

    #[test]
    fn entries_that_are_not_pairs_are_rejected() {
        assert_eq!(
            parse(r#"[["A","B"],["A","B","C"]]"#),
            Err(ValidationError::NotAPair { index: 1, len: 3 })
        );
        assert_eq!(
            parse(r#"[["A"]]"#),
            Err(ValidationError::NotAPair { index: 0, len: 1 })
        );
    }

    #[test]
    fn self_edges_are_rejected() {
        assert_eq!(
            parse(r#"[["A","B"],["C","C"]]"#),
            Err(ValidationError::SelfEdge {
                index: 1,
                name: "C".to_string()
            })
        );
    }

    #[test]
    fn non_string_entries_are_a_json_error() {
        assert!(matches!(
            parse_edge_list(r#"[[1,2]]"#.as_bytes()),
            Err(EdgeListError::Json(_))
        ));
    }

    #[test]
    fn written_list_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("edges.json");
        let edges = vec![Edge::new("hub", "x"), Edge::new("hub", "y")];

        write_edge_list(&path, &edges).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[\n    \"hub\",\n    \"x\"\n  ]"));
        assert_eq!(read_edge_list(&path).unwrap(), edges);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_edge_list(Path::new("/nonexistent/edges.json")).unwrap_err();
        assert!(matches!(err, FileError::Io { ref path, .. } if path.ends_with("edges.json")));
    }
}
