//! Contracts for the external computations the pipeline drives.
//!
//! The pipeline never computes an atom mapping or a free-energy leg itself; it hands
//! the work to an [`AtomMapper`] and a [`LegRunner`] and only validates and records
//! what comes back.

use crate::core::models::atom_core::AtomCore;
use crate::core::models::compound::Compound;
use crate::core::models::leg::{Leg, LegResult};
use crate::core::models::params::MdParams;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("I/O error while talking to '{program}': {source}")]
    Io {
        program: String,
        source: std::io::Error,
    },
    #[error("'{program}' exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("Unreadable response from '{program}': {source}")]
    Protocol {
        program: String,
        source: serde_json::Error,
    },
    #[error("Atom mapper returned no candidate cores")]
    NoCandidates,
    #[error("Invalid collaborator output: {0}")]
    InvalidOutput(String),
    #[error("{0}")]
    Failed(String),
}

/// Atom-mapping settings passed verbatim to the mapper.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingConfig {
    pub ring_cutoff: f64,
    pub chain_cutoff: f64,
    pub max_visits: u64,
    pub max_cores: u64,
    pub connected_core: bool,
    pub enforce_core_core: bool,
    pub ring_matches_ring_only: bool,
    pub complete_rings: bool,
    pub enforce_chiral: bool,
    pub disallow_planar_torsion_flips: bool,
    pub min_threshold: usize,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            ring_cutoff: 0.12,
            chain_cutoff: 0.2,
            max_visits: 10_000_000,
            max_cores: 100_000,
            connected_core: true,
            enforce_core_core: true,
            ring_matches_ring_only: true,
            complete_rings: true,
            enforce_chiral: true,
            disallow_planar_torsion_flips: true,
            min_threshold: 0,
        }
    }
}

/// A loaded forcefield, opaque to the pipeline.
///
/// `path` is set when the identifier named an existing file; otherwise the identifier is
/// handed to the leg runner unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Forcefield {
    pub identifier: String,
    pub path: Option<PathBuf>,
}

/// Everything a leg runner needs to compute one leg of one edge.
#[derive(Debug, Clone, Serialize)]
pub struct LegRequest<'a> {
    pub leg: Leg,
    pub compound_a: &'a Compound,
    pub compound_b: &'a Compound,
    pub core: &'a AtomCore,
    pub forcefield: &'a Forcefield,
    /// Receptor structure; only set for [`Leg::Complex`].
    pub receptor: Option<&'a Path>,
    pub md_params: &'a MdParams,
    pub max_windows: usize,
    pub min_overlap: f64,
}

/// Raw per-window output of a leg computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegOutput {
    pub dgs: Vec<f64>,
    pub dg_errs: Vec<f64>,
    pub num_windows: usize,
    /// Overlap between each pair of adjacent windows.
    pub overlaps: Vec<f64>,
}

impl LegOutput {
    /// Reduces the per-window output to the stored summary.
    ///
    /// The ddG is the sum of the window deltas, the error is the Euclidean norm of the
    /// window errors and the minimum overlap is the smallest adjacent overlap.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError::InvalidOutput`] if the arrays are empty or of
    /// unequal length, an overlap lies outside `[0, 1]`, an error is negative or
    /// non-finite, or no window was computed.
    pub fn summarize(&self) -> Result<LegResult, CollaboratorError> {
        let invalid = |msg: String| -> Result<LegResult, CollaboratorError> {
            Err(CollaboratorError::InvalidOutput(msg))
        };

        if self.dgs.is_empty() {
            return invalid("no window results".to_string());
        }
        if self.dg_errs.len() != self.dgs.len() || self.overlaps.len() != self.dgs.len() {
            return invalid(format!(
                "mismatched lengths: {} dgs, {} errors, {} overlaps",
                self.dgs.len(),
                self.dg_errs.len(),
                self.overlaps.len()
            ));
        }
        if self.num_windows == 0 {
            return invalid("window count must be at least 1".to_string());
        }
        if let Some(dg) = self.dgs.iter().find(|dg| !dg.is_finite()) {
            return invalid(format!("non-finite window delta {dg}"));
        }
        if let Some(err) = self.dg_errs.iter().find(|e| !(e.is_finite() && **e >= 0.0)) {
            return invalid(format!("window error {err} is not a non-negative number"));
        }
        if let Some(overlap) = self.overlaps.iter().find(|o| !(0.0..=1.0).contains(*o)) {
            return invalid(format!("overlap {overlap} lies outside [0, 1]"));
        }

        let errors = DVector::from_column_slice(&self.dg_errs);
        Ok(LegResult {
            pred_ddg: self.dgs.iter().sum(),
            pred_ddg_err: errors.norm(),
            windows: self.num_windows,
            min_overlap: self.overlaps.iter().copied().fold(f64::INFINITY, f64::min),
        })
    }
}

/// Produces ranked atom-correspondence candidates for a compound pair.
pub trait AtomMapper {
    fn map_atoms(
        &self,
        a: &Compound,
        b: &Compound,
        config: &MappingConfig,
    ) -> Result<Vec<AtomCore>, CollaboratorError>;
}

/// Runs one free-energy leg for an edge.
pub trait LegRunner {
    fn run_leg(&self, request: &LegRequest<'_>) -> Result<LegOutput, CollaboratorError>;
}

pub trait ForcefieldLoader {
    fn load(&self, identifier: &str) -> Result<Forcefield, CollaboratorError>;
}
