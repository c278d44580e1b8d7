use super::collaborators::MappingConfig;
use crate::core::models::params::{MdParams, RunParams};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

const STEPS_PER_FRAME: u64 = 400;
const SEED: i64 = 2023;
const LOCAL_STEPS: u64 = 0;
const MIN_OVERLAP: f64 = 0.333;

/// Named simulation scales. Each is a distinct parameter set, so a document started at
/// one scale can never be resumed at the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMode {
    #[default]
    Full,
    Testing,
}

impl ScaleMode {
    pub fn n_eq_steps(self) -> u64 {
        match self {
            ScaleMode::Full => 200_000,
            ScaleMode::Testing => 100,
        }
    }

    pub fn n_frames(self) -> u64 {
        match self {
            ScaleMode::Full => 2000,
            ScaleMode::Testing => 100,
        }
    }

    pub fn max_windows(self) -> usize {
        match self {
            ScaleMode::Full => 24,
            ScaleMode::Testing => 2,
        }
    }

    pub fn run_params(self) -> RunParams {
        RunParams {
            md_params: MdParams {
                n_eq_steps: self.n_eq_steps(),
                n_frames: self.n_frames(),
                steps_per_frame: STEPS_PER_FRAME,
                seed: SEED,
                local_steps: LOCAL_STEPS,
                extra: BTreeMap::new(),
            },
            max_windows: self.max_windows(),
            min_overlap: MIN_OVERLAP,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub params: RunParams,
    pub forcefield: String,
    pub receptor_path: Option<PathBuf>,
    /// Fixed to [`MappingConfig::default`]; it is not recorded in the result document.
    pub mapping: MappingConfig,
    /// `target -> source` property copies applied to every compound before mapping.
    pub property_aliases: BTreeMap<String, String>,
}

#[derive(Default)]
pub struct RunConfigBuilder {
    n_eq_steps: Option<u64>,
    n_frames: Option<u64>,
    steps_per_frame: Option<u64>,
    seed: Option<i64>,
    local_steps: Option<u64>,
    max_windows: Option<usize>,
    min_overlap: Option<f64>,
    forcefield: Option<String>,
    receptor_path: Option<PathBuf>,
    property_aliases: BTreeMap<String, String>,
}

impl RunConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the parameter set of `scale`.
    pub fn from_scale(scale: ScaleMode) -> Self {
        let params = scale.run_params();
        Self::new()
            .n_eq_steps(params.md_params.n_eq_steps)
            .n_frames(params.md_params.n_frames)
            .steps_per_frame(params.md_params.steps_per_frame)
            .seed(params.md_params.seed)
            .local_steps(params.md_params.local_steps)
            .max_windows(params.max_windows)
            .min_overlap(params.min_overlap)
    }

    pub fn n_eq_steps(mut self, steps: u64) -> Self {
        self.n_eq_steps = Some(steps);
        self
    }
    pub fn n_frames(mut self, frames: u64) -> Self {
        self.n_frames = Some(frames);
        self
    }
    pub fn steps_per_frame(mut self, steps: u64) -> Self {
        self.steps_per_frame = Some(steps);
        self
    }
    pub fn seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn local_steps(mut self, steps: u64) -> Self {
        self.local_steps = Some(steps);
        self
    }
    pub fn max_windows(mut self, windows: usize) -> Self {
        self.max_windows = Some(windows);
        self
    }
    pub fn min_overlap(mut self, overlap: f64) -> Self {
        self.min_overlap = Some(overlap);
        self
    }
    pub fn forcefield(mut self, identifier: impl Into<String>) -> Self {
        self.forcefield = Some(identifier.into());
        self
    }
    pub fn receptor_path(mut self, path: PathBuf) -> Self {
        self.receptor_path = Some(path);
        self
    }
    pub fn property_alias(mut self, target: impl Into<String>, source: impl Into<String>) -> Self {
        self.property_aliases.insert(target.into(), source.into());
        self
    }

    pub fn build(self) -> Result<RunConfig, ConfigError> {
        let md_params = MdParams {
            n_eq_steps: self
                .n_eq_steps
                .ok_or(ConfigError::MissingParameter("n_eq_steps"))?,
            n_frames: self
                .n_frames
                .ok_or(ConfigError::MissingParameter("n_frames"))?,
            steps_per_frame: self
                .steps_per_frame
                .ok_or(ConfigError::MissingParameter("steps_per_frame"))?,
            seed: self.seed.ok_or(ConfigError::MissingParameter("seed"))?,
            local_steps: self
                .local_steps
                .ok_or(ConfigError::MissingParameter("local_steps"))?,
            extra: BTreeMap::new(),
        };
        let max_windows = self
            .max_windows
            .ok_or(ConfigError::MissingParameter("max_windows"))?;
        let min_overlap = self
            .min_overlap
            .ok_or(ConfigError::MissingParameter("min_overlap"))?;

        if md_params.n_frames == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "n_frames",
                reason: "must be at least 1".to_string(),
            });
        }
        if md_params.steps_per_frame == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "steps_per_frame",
                reason: "must be at least 1".to_string(),
            });
        }
        if max_windows == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_windows",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&min_overlap) {
            return Err(ConfigError::InvalidParameter {
                name: "min_overlap",
                reason: format!("{min_overlap} is outside [0, 1]"),
            });
        }

        Ok(RunConfig {
            params: RunParams {
                md_params,
                max_windows,
                min_overlap,
            },
            forcefield: self
                .forcefield
                .ok_or(ConfigError::MissingParameter("forcefield"))?,
            receptor_path: self.receptor_path,
            mapping: MappingConfig::default(),
            property_aliases: self.property_aliases,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_share_everything_but_length_and_windows() {
        let full = ScaleMode::Full.run_params();
        let testing = ScaleMode::Testing.run_params();

        assert_eq!(full.md_params.n_eq_steps, 200_000);
        assert_eq!(full.md_params.n_frames, 2000);
        assert_eq!(full.max_windows, 24);
        assert_eq!(testing.md_params.n_eq_steps, 100);
        assert_eq!(testing.md_params.n_frames, 100);
        assert_eq!(testing.max_windows, 2);

        for params in [&full, &testing] {
            assert_eq!(params.md_params.steps_per_frame, 400);
            assert_eq!(params.md_params.seed, 2023);
            assert_eq!(params.md_params.local_steps, 0);
            assert_eq!(params.min_overlap, 0.333);
        }
        assert!(full.first_mismatch(&testing).is_some());
    }

    #[test]
    fn builder_from_scale_reproduces_preset() {
        let config = RunConfigBuilder::from_scale(ScaleMode::Testing)
            .forcefield("ff.py")
            .property_alias("AM1ELF10Cache", "AM1Cache")
            .build()
            .unwrap();

        assert_eq!(config.params, ScaleMode::Testing.run_params());
        assert_eq!(config.mapping, MappingConfig::default());
        assert_eq!(config.receptor_path, None);
        assert_eq!(
            config.property_aliases.get("AM1ELF10Cache").map(String::as_str),
            Some("AM1Cache")
        );
    }

    #[test]
    fn missing_forcefield_is_reported() {
        let result = RunConfigBuilder::from_scale(ScaleMode::Full).build();
        assert_eq!(result, Err(ConfigError::MissingParameter("forcefield")));
    }

    #[test]
    fn missing_md_parameter_is_reported() {
        let result = RunConfigBuilder::new().forcefield("ff").build();
        assert_eq!(result, Err(ConfigError::MissingParameter("n_eq_steps")));
    }

    #[test]
    fn zero_windows_is_invalid() {
        let result = RunConfigBuilder::from_scale(ScaleMode::Full)
            .forcefield("ff")
            .max_windows(0)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter { name: "max_windows", .. })
        ));
    }

    #[test]
    fn overlap_outside_unit_interval_is_invalid() {
        for overlap in [-0.1, 1.5, f64::NAN] {
            let result = RunConfigBuilder::from_scale(ScaleMode::Full)
                .forcefield("ff")
                .min_overlap(overlap)
                .build();
            assert!(matches!(
                result,
                Err(ConfigError::InvalidParameter { name: "min_overlap", .. })
            ));
        }
    }
}
