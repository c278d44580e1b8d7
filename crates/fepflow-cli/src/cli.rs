use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu",
    version,
    about = "fepflow CLI - A resumable pipeline for star-map relative binding free-energy campaigns.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a star-map edge list connecting a hub compound to every other compound.
    Topology(TopologyArgs),
    /// Split an edge list into contiguous parts for independent drivers.
    Partition(PartitionArgs),
    /// Compute atom cores and free-energy legs for every edge, resuming any previous run.
    Run(RunArgs),
    /// Rank finished edges from one or more result documents into a CSV report.
    Aggregate(AggregateArgs),
}

/// Arguments for the `topology` subcommand.
#[derive(Args, Debug)]
pub struct TopologyArgs {
    /// Path to the compound table (CSV with name, structure and num_atoms columns).
    #[arg(value_name = "COMPOUNDS")]
    pub compounds: PathBuf,

    /// Name of the hub compound every edge starts from.
    #[arg(value_name = "HUB")]
    pub hub: String,

    /// Where to write the edge list. Defaults to `<COMPOUNDS stem>_edges.json` in the
    /// current directory.
    #[arg(short, long, value_name = "PATH")]
    pub output_path: Option<PathBuf>,
}

/// Arguments for the `partition` subcommand.
#[derive(Args, Debug)]
pub struct PartitionArgs {
    /// Path to the edge list to split.
    #[arg(value_name = "EDGES")]
    pub edges: PathBuf,

    /// Number of parts to produce (at least 2).
    #[arg(value_name = "NUM_PARTS")]
    pub num_parts: usize,

    /// Directory for the `<stem>_part_<i>.json` files. Defaults to the input's directory.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    // --- Core Arguments ---
    /// Path to the compound table.
    #[arg(value_name = "COMPOUNDS")]
    pub compounds: PathBuf,

    /// Path to the receptor structure used by the complex leg.
    #[arg(value_name = "STRUCTURE")]
    pub structure: PathBuf,

    /// Path to the edge list to process.
    #[arg(value_name = "EDGES")]
    pub edges: PathBuf,

    /// Path of the result document; resumed if it already exists.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Overrides ---
    /// Forcefield to simulate with. Can be a path or a bare identifier.
    #[arg(long, value_name = "NAME_OR_PATH")]
    pub forcefield: Option<String>,

    /// Use the reduced testing scale instead of the full production scale.
    #[arg(long)]
    pub testing: bool,

    /// Command line of the atom-mapping program (e.g. "python3 map_atoms.py").
    #[arg(long, value_name = "CMD")]
    pub mapper_command: Option<String>,

    /// Command line of the leg-running program (e.g. "python3 run_leg.py").
    #[arg(long, value_name = "CMD")]
    pub runner_command: Option<String>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S sampling.max-windows=48
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `aggregate` subcommand.
#[derive(Args, Debug)]
pub struct AggregateArgs {
    /// Path to the compound table.
    #[arg(value_name = "COMPOUNDS")]
    pub compounds: PathBuf,

    /// Result documents, or directories whose `*.json` files are all read.
    #[arg(value_name = "DOC_OR_DIR", required = true, num_args = 1..)]
    pub documents: Vec<PathBuf>,

    /// Name of the reference (hub) compound.
    #[arg(short, long, value_name = "NAME")]
    pub reference: String,

    /// Where to write the CSV report. Defaults to standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
