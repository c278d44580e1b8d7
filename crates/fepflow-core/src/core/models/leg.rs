use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three computational contexts combined into a binding free energy.
///
/// The declaration order is the order in which legs are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Leg {
    Vacuum,
    Solvent,
    Complex,
}

impl Leg {
    pub const ALL: [Leg; 3] = [Leg::Vacuum, Leg::Solvent, Leg::Complex];

    pub fn as_str(&self) -> &'static str {
        match self {
            Leg::Vacuum => "vacuum",
            Leg::Solvent => "solvent",
            Leg::Complex => "complex",
        }
    }

    /// Only the complex leg is simulated against the receptor structure.
    pub fn uses_receptor(&self) -> bool {
        matches!(self, Leg::Complex)
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of one finished leg, as stored in the result document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegResult {
    /// Sum of the per-window free-energy deltas.
    pub pred_ddg: f64,
    /// Euclidean norm of the per-window error estimates.
    pub pred_ddg_err: f64,
    /// Number of windows the collaborator actually ran.
    pub windows: usize,
    /// Smallest overlap between adjacent windows.
    pub min_overlap: f64,
}
