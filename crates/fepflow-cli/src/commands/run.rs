use super::load_compounds;
use crate::cli::RunArgs;
use crate::config::PartialRunConfig;
use crate::error::{CliError, Result};
use crate::ui::{CliProgressHandler, UiEvent};
use fepflow::{
    core::io::edges::read_edge_list,
    engine::{
        collaborators::ForcefieldLoader,
        context::PipelineContext,
        external::{CommandAtomMapper, CommandLegRunner, FileForcefieldLoader},
        progress::ProgressReporter,
    },
    workflows,
};
use tokio::sync::mpsc;
use tracing::info;

pub async fn run(args: RunArgs, ui_sender: mpsc::Sender<UiEvent>) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialRunConfig::from_file(path)?,
        None => PartialRunConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let resolved = partial_config.merge_with_cli(&args)?;

    if !args.structure.is_file() {
        return Err(CliError::Argument(format!(
            "receptor structure does not exist: {}",
            args.structure.display()
        )));
    }
    let forcefield = FileForcefieldLoader
        .load(&resolved.config.forcefield)
        .map_err(|e| CliError::Config(format!("Failed to load forcefield: {e}")))?;
    info!(forcefield = %forcefield.identifier, "Forcefield resolved.");

    let compounds = load_compounds(&args.compounds)?;
    info!("Loading edge list from {:?}", &args.edges);
    let edges = read_edge_list(&args.edges)?;

    let mapper = CommandAtomMapper::new(resolved.mapper);
    let runner = CommandLegRunner::new(resolved.runner);
    let progress_handler = CliProgressHandler::new(ui_sender);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let ctx = PipelineContext::new(
        &resolved.config,
        &forcefield,
        &mapper,
        &runner,
        &reporter,
    );

    println!(
        "Processing {} edge(s) into {}...",
        edges.len(),
        args.output.display()
    );
    let summary = tokio::task::block_in_place(|| {
        workflows::run::run(&args.output, &edges, &compounds, &ctx)
    })?;

    println!(
        "✓ {} edge(s) complete: {} core(s) and {} leg(s) computed, {} core(s) and {} leg(s) already stored.",
        summary.edges,
        summary.cores_computed,
        summary.legs_computed,
        summary.cores_reused,
        summary.legs_skipped
    );
    Ok(())
}
