use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Molecular-dynamics settings handed to the leg runner.
///
/// Keys written by other tools that this crate does not model are kept in `extra` so
/// that rewriting a document never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MdParams {
    pub n_eq_steps: u64,
    pub n_frames: u64,
    pub steps_per_frame: u64,
    pub seed: i64,
    pub local_steps: u64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// The global parameters frozen into a result document on first write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParams {
    pub md_params: MdParams,
    pub max_windows: usize,
    pub min_overlap: f64,
}

/// The first field on which two parameter sets disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamMismatch {
    pub field: &'static str,
    pub stored: String,
    pub requested: String,
}

impl RunParams {
    /// Compares every requested field against `self`, the stored parameters.
    ///
    /// Floats are compared by bit pattern. Keys in [`MdParams::extra`] are not compared:
    /// a run can only request the modeled fields.
    pub fn first_mismatch(&self, requested: &RunParams) -> Option<ParamMismatch> {
        fn check<T: PartialEq + ToString>(
            field: &'static str,
            stored: T,
            requested: T,
        ) -> Option<ParamMismatch> {
            (stored != requested).then(|| ParamMismatch {
                field,
                stored: stored.to_string(),
                requested: requested.to_string(),
            })
        }

        let (s, r) = (&self.md_params, &requested.md_params);
        check("md_params.n_eq_steps", s.n_eq_steps, r.n_eq_steps)
            .or_else(|| check("md_params.n_frames", s.n_frames, r.n_frames))
            .or_else(|| check("md_params.steps_per_frame", s.steps_per_frame, r.steps_per_frame))
            .or_else(|| check("md_params.seed", s.seed, r.seed))
            .or_else(|| check("md_params.local_steps", s.local_steps, r.local_steps))
            .or_else(|| check("max_windows", self.max_windows, requested.max_windows))
            .or_else(|| {
                (self.min_overlap.to_bits() != requested.min_overlap.to_bits()).then(|| {
                    ParamMismatch {
                        field: "min_overlap",
                        stored: self.min_overlap.to_string(),
                        requested: requested.min_overlap.to_string(),
                    }
                })
            })
    }
}
