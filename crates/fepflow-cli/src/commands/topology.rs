use super::{file_stem, load_compounds, output_in};
use crate::cli::TopologyArgs;
use crate::error::Result;
use fepflow::core::io::edges::write_edge_list;
use fepflow::core::topology::star::star_map;
use fepflow::engine::error::EngineError;
use tracing::info;

pub async fn run(args: TopologyArgs) -> Result<()> {
    let compounds = load_compounds(&args.compounds)?;

    let edges = star_map(compounds.names(), &args.hub).map_err(EngineError::from)?;
    info!(hub = %args.hub, edges = edges.len(), "Generated star map.");

    let output_path = match args.output_path {
        Some(path) => path,
        None => output_in(None, format!("{}_edges.json", file_stem(&args.compounds)?)),
    };
    write_edge_list(&output_path, &edges)?;

    println!(
        "✓ Wrote {} edge(s) centered on '{}' to: {}",
        edges.len(),
        args.hub,
        output_path.display()
    );
    Ok(())
}
