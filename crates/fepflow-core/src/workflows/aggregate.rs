use crate::core::io::FileError;
use crate::core::models::compound::{Compound, CompoundSet};
use crate::core::models::document::ResultDocument;
use crate::core::models::edge::{Edge, EdgeRecord};
use crate::core::models::leg::Leg;
use crate::engine::error::EngineError;
use nalgebra::Vector2;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// One line of the ranked binding report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub mol_name: String,
    #[serde(rename = "SMILES")]
    pub structure: String,
    #[serde(rename = "dG_bind")]
    pub dg_bind: f64,
    #[serde(rename = "dG_bind_err")]
    pub dg_bind_err: f64,
    /// Empty when the vacuum leg was never computed; it does not enter `dg_bind`.
    #[serde(rename = "vacuum_dG_bind")]
    pub vacuum_ddg: Option<f64>,
    #[serde(rename = "solvent_dG_bind")]
    pub solvent_ddg: f64,
    #[serde(rename = "complex_dG_bind")]
    pub complex_ddg: f64,
    pub external_score: Option<f64>,
    pub dummy_atoms: usize,
}

impl ReportRow {
    fn reference(compound: &Compound) -> Self {
        Self {
            mol_name: compound.name.clone(),
            structure: compound.structure.clone(),
            dg_bind: 0.0,
            dg_bind_err: 0.0,
            vacuum_ddg: Some(0.0),
            solvent_ddg: 0.0,
            complex_ddg: 0.0,
            external_score: compound.score,
            dummy_atoms: 0,
        }
    }
}

fn lookup<'c>(compounds: &'c CompoundSet, name: &str) -> Result<&'c Compound, EngineError> {
    compounds.get(name).ok_or_else(|| EngineError::Lookup {
        name: name.to_string(),
    })
}

/// Ranks every finished edge of `documents` relative to `reference`.
///
/// An edge is reported once it has both a solvent and a complex leg. The reference row
/// is always present with zero free energies. Rows are sorted by ascending `dG_bind`,
/// ties keeping document order.
///
/// # Errors
///
/// Returns [`EngineError::DataIntegrity`] if a reportable edge does not start at the
/// reference or has no atom core, and [`EngineError::Lookup`] if a compound is unknown.
#[instrument(skip_all, name = "aggregate_workflow", fields(reference = %reference))]
pub fn run(
    documents: &[ResultDocument],
    compounds: &CompoundSet,
    reference: &str,
) -> Result<Vec<ReportRow>, EngineError> {
    let reference_compound = lookup(compounds, reference)?;
    let mut rows = vec![ReportRow::reference(reference_compound)];

    if let Some((first, rest)) = documents.split_first() {
        for (index, document) in rest.iter().enumerate() {
            if let Some(mismatch) = first.params().first_mismatch(document.params()) {
                warn!(
                    document = index + 1,
                    field = mismatch.field,
                    first = %mismatch.stored,
                    this = %mismatch.requested,
                    "Aggregating documents computed with different parameters."
                );
            }
        }
    }

    let mut seen: HashSet<Edge> = HashSet::new();
    let mut skipped = 0usize;
    for record in documents.iter().flat_map(ResultDocument::records) {
        let (Some(complex), Some(solvent)) = (record.leg(Leg::Complex), record.leg(Leg::Solvent))
        else {
            skipped += 1;
            continue;
        };
        if record.mol_a != reference {
            return Err(EngineError::DataIntegrity(format!(
                "edge ({}, {}) does not start at reference compound '{reference}'",
                record.mol_a, record.mol_b
            )));
        }
        if !seen.insert(record.key()) {
            warn!(mol_b = %record.mol_b, "Edge appears in more than one document; reporting every copy.");
        }

        let compound = lookup(compounds, &record.mol_b)?;
        rows.push(ReportRow {
            mol_name: compound.name.clone(),
            structure: compound.structure.clone(),
            dg_bind: complex.pred_ddg - solvent.pred_ddg,
            dg_bind_err: Vector2::new(complex.pred_ddg_err, solvent.pred_ddg_err).norm(),
            vacuum_ddg: record.leg(Leg::Vacuum).map(|v| v.pred_ddg),
            solvent_ddg: solvent.pred_ddg,
            complex_ddg: complex.pred_ddg,
            external_score: compound.score,
            dummy_atoms: dummy_atoms(record, reference_compound, compound)?,
        });
    }

    debug!(skipped, "Skipped edges without both solvent and complex legs.");
    rows.sort_by(|a, b| a.dg_bind.total_cmp(&b.dg_bind));
    info!(rows = rows.len(), "Aggregated binding report.");
    Ok(rows)
}

/// Atoms of either compound that the core leaves unmatched.
fn dummy_atoms(
    record: &EdgeRecord,
    mol_a: &Compound,
    mol_b: &Compound,
) -> Result<usize, EngineError> {
    let core = record.core.as_ref().ok_or_else(|| {
        EngineError::DataIntegrity(format!(
            "edge ({}, {}) has leg results but no atom core",
            record.mol_a, record.mol_b
        ))
    })?;
    (mol_a.num_atoms + mol_b.num_atoms)
        .checked_sub(2 * core.len())
        .ok_or_else(|| {
            EngineError::DataIntegrity(format!(
                "atom core of edge ({}, {}) is larger than its compounds",
                record.mol_a, record.mol_b
            ))
        })
}

/// Writes `rows` as CSV with a header line.
pub fn write_report<W: Write>(rows: &[ReportRow], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_report_to_path(rows: &[ReportRow], path: &Path) -> Result<(), EngineError> {
    let file = File::create(path).map_err(|e| FileError::io(path, e))?;
    write_report(rows, file).map_err(|e| FileError::io(path, e.into()))?;
    Ok(())
}
