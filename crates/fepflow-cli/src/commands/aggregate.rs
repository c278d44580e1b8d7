use super::load_compounds;
use crate::cli::AggregateArgs;
use crate::error::{CliError, Result};
use fepflow::core::models::document::ResultDocument;
use fepflow::workflows::aggregate;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub async fn run(args: AggregateArgs) -> Result<()> {
    let compounds = load_compounds(&args.compounds)?;

    let paths = expand_documents(&args.documents)?;
    let mut documents = Vec::with_capacity(paths.len());
    for path in &paths {
        debug!("Reading result document {:?}", path);
        documents.push(ResultDocument::read_from_path(path)?);
    }
    info!(documents = documents.len(), "Loaded result documents.");

    let rows = aggregate::run(&documents, &compounds, &args.reference)?;

    match &args.output {
        Some(path) => {
            aggregate::write_report_to_path(&rows, path)?;
            println!(
                "✓ Ranked {} compound(s) from {} document(s) into: {}",
                rows.len(),
                documents.len(),
                path.display()
            );
        }
        None => {
            let stdout = std::io::stdout();
            aggregate::write_report(&rows, stdout.lock())
                .map_err(|e| CliError::Other(e.into()))?;
        }
    }
    Ok(())
}

/// Replaces each directory with the `*.json` files directly inside it, sorted by name.
fn expand_documents(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            paths.push(input.clone());
            continue;
        }
        let mut found = Vec::new();
        for entry in std::fs::read_dir(input)? {
            let path = entry?.path();
            if path.is_file() && has_json_extension(&path) {
                found.push(path);
            }
        }
        found.sort();
        if found.is_empty() {
            return Err(CliError::Argument(format!(
                "no result documents (*.json) found in {}",
                input.display()
            )));
        }
        paths.extend(found);
    }
    Ok(paths)
}

fn has_json_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fepflow::core::models::atom_core::AtomCore;
    use fepflow::core::models::edge::{Edge, EdgeRecord};
    use fepflow::core::models::leg::{Leg, LegResult};
    use fepflow::engine::config::ScaleMode;
    use fepflow::engine::error::EngineError;
    use std::fs;
    use tempfile::tempdir;

    fn leg(pred_ddg: f64) -> LegResult {
        LegResult {
            pred_ddg,
            pred_ddg_err: 0.0,
            windows: 2,
            min_overlap: 0.5,
        }
    }

    fn finished(mol_b: &str, complex: f64, solvent: f64) -> EdgeRecord {
        let mut record = EdgeRecord::new(&Edge::new("hub", mol_b));
        record.core = Some(AtomCore::new(vec![(0, 0)]).unwrap());
        record.set_leg(Leg::Solvent, leg(solvent));
        record.set_leg(Leg::Complex, leg(complex));
        record
    }

    fn write_document(path: &Path, records: Vec<EdgeRecord>) {
        let mut document = ResultDocument::new(ScaleMode::Testing.run_params());
        for record in records {
            document.upsert(record);
        }
        document.write_to_path(path).unwrap();
    }

    fn fixture(dir: &Path) -> PathBuf {
        let compounds = dir.join("ligands.csv");
        fs::write(
            &compounds,
            "name,structure,num_atoms\nhub,CCO,3\nlig1,CCN,3\nlig2,CCC,4\n",
        )
        .unwrap();
        let parts = dir.join("parts");
        fs::create_dir(&parts).unwrap();
        write_document(&parts.join("part_0.json"), vec![finished("lig1", -1.0, 1.0)]);
        write_document(&parts.join("part_1.json"), vec![finished("lig2", -2.0, 1.0)]);
        fs::write(parts.join("notes.txt"), "not a document").unwrap();
        compounds
    }

    #[test]
    fn directories_expand_to_sorted_json_files() {
        let dir = tempdir().unwrap();
        fixture(dir.path());
        let single = dir.path().join("single.json");

        let paths = expand_documents(&[single.clone(), dir.path().join("parts")]).unwrap();

        assert_eq!(
            paths,
            vec![
                single,
                dir.path().join("parts/part_0.json"),
                dir.path().join("parts/part_1.json"),
            ]
        );
    }

    #[test]
    fn directory_without_documents_is_rejected() {
        let dir = tempdir().unwrap();
        let result = expand_documents(&[dir.path().to_path_buf()]);
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[tokio::test]
    async fn report_is_ranked_across_documents() {
        let dir = tempdir().unwrap();
        let compounds = fixture(dir.path());
        let output = dir.path().join("report.csv");

        run(AggregateArgs {
            compounds,
            documents: vec![dir.path().join("parts")],
            reference: "hub".to_string(),
            output: Some(output.clone()),
        })
        .await
        .unwrap();

        let report = fs::read_to_string(&output).unwrap();
        let names: Vec<&str> = report
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap())
            .collect();
        assert_eq!(names, vec!["lig2", "lig1", "hub"]);
    }

    #[tokio::test]
    async fn unknown_reference_is_a_lookup_error() {
        let dir = tempdir().unwrap();
        let compounds = fixture(dir.path());

        let result = run(AggregateArgs {
            compounds,
            documents: vec![dir.path().join("parts")],
            reference: "nobody".to_string(),
            output: None,
        })
        .await;

        assert!(matches!(
            result,
            Err(CliError::Engine(EngineError::Lookup { .. }))
        ));
    }
}
