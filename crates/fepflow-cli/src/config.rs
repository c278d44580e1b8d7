use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use fepflow::engine::config::{RunConfig, RunConfigBuilder, ScaleMode};
use fepflow::engine::external::CommandSpec;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

const DEFAULT_FORCEFIELD: &str = "smirnoff_2_2_0_ccc.py";

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
enum PartialScale {
    Full,
    Testing,
}

impl From<PartialScale> for ScaleMode {
    fn from(p: PartialScale) -> Self {
        match p {
            PartialScale::Full => ScaleMode::Full,
            PartialScale::Testing => ScaleMode::Testing,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialMdConfig {
    n_eq_steps: Option<u64>,
    n_frames: Option<u64>,
    steps_per_frame: Option<u64>,
    seed: Option<i64>,
    local_steps: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialSamplingConfig {
    max_windows: Option<usize>,
    min_overlap: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialCommand {
    program: Option<String>,
    #[serde(default)]
    args: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialCollaboratorsConfig {
    atom_mapper: Option<PartialCommand>,
    leg_runner: Option<PartialCommand>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialCompoundsConfig {
    /// `target = "source"` property copies.
    #[serde(default)]
    property_aliases: BTreeMap<String, String>,
}

/// Everything a `run` needs beyond the input files.
#[derive(Debug)]
pub struct ResolvedRun {
    pub config: RunConfig,
    pub mapper: CommandSpec,
    pub runner: CommandSpec,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialRunConfig {
    scale: Option<PartialScale>,
    forcefield: Option<String>,
    md: Option<PartialMdConfig>,
    sampling: Option<PartialSamplingConfig>,
    collaborators: Option<PartialCollaboratorsConfig>,
    compounds: Option<PartialCompoundsConfig>,
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Layers scale preset, file values, explicit flags and `--set` overrides, in that
    /// order of increasing precedence.
    pub fn merge_with_cli(mut self, args: &RunArgs) -> Result<ResolvedRun> {
        self.apply_cli_flags(args)?;
        self.apply_set_values(&args.set_values)?;

        let scale = self.scale.map(ScaleMode::from).unwrap_or_default();
        debug!(?scale, "Resolved simulation scale.");

        let md = self.md.take().unwrap_or_default();
        let sampling = self.sampling.take().unwrap_or_default();
        let collaborators = self.collaborators.take().unwrap_or_default();
        let compounds = self.compounds.take().unwrap_or_default();

        let forcefield = self
            .forcefield
            .take()
            .unwrap_or_else(|| DEFAULT_FORCEFIELD.to_string());

        let mut builder = RunConfigBuilder::from_scale(scale)
            .forcefield(forcefield)
            .receptor_path(args.structure.clone());
        if let Some(v) = md.n_eq_steps {
            builder = builder.n_eq_steps(v);
        }
        if let Some(v) = md.n_frames {
            builder = builder.n_frames(v);
        }
        if let Some(v) = md.steps_per_frame {
            builder = builder.steps_per_frame(v);
        }
        if let Some(v) = md.seed {
            builder = builder.seed(v);
        }
        if let Some(v) = md.local_steps {
            builder = builder.local_steps(v);
        }
        if let Some(v) = sampling.max_windows {
            builder = builder.max_windows(v);
        }
        if let Some(v) = sampling.min_overlap {
            builder = builder.min_overlap(v);
        }
        for (target, source) in compounds.property_aliases {
            builder = builder.property_alias(target, source);
        }

        let mapper = Self::resolve_command(
            collaborators.atom_mapper,
            "collaborators.atom-mapper",
            "--mapper-command",
        )?;
        let runner = Self::resolve_command(
            collaborators.leg_runner,
            "collaborators.leg-runner",
            "--runner-command",
        )?;

        let config = builder.build().map_err(|e| CliError::Config(e.to_string()))?;
        Ok(ResolvedRun {
            config,
            mapper,
            runner,
        })
    }

    fn resolve_command(
        value: Option<PartialCommand>,
        section: &str,
        flag: &str,
    ) -> Result<CommandSpec> {
        match value {
            Some(PartialCommand {
                program: Some(program),
                args,
            }) if !program.trim().is_empty() => Ok(CommandSpec::new(program, args)),
            _ => Err(CliError::Config(format!(
                "A program for '{section}' is required either in the config file or via {flag}."
            ))),
        }
    }

    /// Explicit flags replace the matching file values; `--set` is applied afterwards.
    fn apply_cli_flags(&mut self, args: &RunArgs) -> Result<()> {
        if args.testing {
            self.scale = Some(PartialScale::Testing);
        }
        if let Some(forcefield) = &args.forcefield {
            self.forcefield = Some(forcefield.clone());
        }
        let collaborators = self.collaborators.get_or_insert_with(Default::default);
        if let Some(line) = &args.mapper_command {
            collaborators.atom_mapper = Some(Self::command_flag(line, "--mapper-command")?);
        }
        if let Some(line) = &args.runner_command {
            collaborators.leg_runner = Some(Self::command_flag(line, "--runner-command")?);
        }
        Ok(())
    }

    fn command_flag(line: &str, flag: &str) -> Result<PartialCommand> {
        let spec = CommandSpec::parse(line)
            .ok_or_else(|| CliError::Argument(format!("{flag} must not be empty")))?;
        Ok(PartialCommand {
            program: Some(spec.program),
            args: spec.args,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "scale" => {
                    self.scale = Some(match value_str {
                        "full" => PartialScale::Full,
                        "testing" => PartialScale::Testing,
                        _ => {
                            return Err(CliError::Config(format!(
                                "Invalid value for scale: {} (expected 'full' or 'testing')",
                                value_str
                            )));
                        }
                    });
                }
                "forcefield" => self.forcefield = Some(value_str.to_string()),
                "md.n-eq-steps" => self.md_mut().n_eq_steps = Some(parse_value(key, value_str)?),
                "md.n-frames" => self.md_mut().n_frames = Some(parse_value(key, value_str)?),
                "md.steps-per-frame" => {
                    self.md_mut().steps_per_frame = Some(parse_value(key, value_str)?)
                }
                "md.seed" => self.md_mut().seed = Some(parse_value(key, value_str)?),
                "md.local-steps" => self.md_mut().local_steps = Some(parse_value(key, value_str)?),
                "sampling.max-windows" => {
                    self.sampling
                        .get_or_insert_with(Default::default)
                        .max_windows = Some(parse_value(key, value_str)?);
                }
                "sampling.min-overlap" => {
                    self.sampling
                        .get_or_insert_with(Default::default)
                        .min_overlap = Some(parse_value(key, value_str)?);
                }
                "collaborators.atom-mapper.program" => {
                    self.collaborators
                        .get_or_insert_with(Default::default)
                        .atom_mapper
                        .get_or_insert_with(Default::default)
                        .program = Some(value_str.to_string());
                }
                "collaborators.leg-runner.program" => {
                    self.collaborators
                        .get_or_insert_with(Default::default)
                        .leg_runner
                        .get_or_insert_with(Default::default)
                        .program = Some(value_str.to_string());
                }
                _ => {
                    if let Some(target) = key.strip_prefix("compounds.property-aliases.") {
                        self.compounds
                            .get_or_insert_with(Default::default)
                            .property_aliases
                            .insert(target.to_string(), value_str.to_string());
                        continue;
                    }
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }

    fn md_mut(&mut self) -> &mut PartialMdConfig {
        self.md.get_or_insert_with(Default::default)
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid {} value for {}: {}",
            std::any::type_name::<T>(),
            key,
            value_str
        ))
    })
}
