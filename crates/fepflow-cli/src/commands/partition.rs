use super::{file_stem, output_in};
use crate::cli::PartitionArgs;
use crate::error::Result;
use fepflow::core::io::edges::{read_edge_list, write_edge_list};
use fepflow::core::topology::partition::partition;
use fepflow::engine::error::EngineError;
use std::path::PathBuf;
use tracing::{info, warn};

pub async fn run(args: PartitionArgs) -> Result<()> {
    let edges = read_edge_list(&args.edges)?;
    let parts = partition(&edges, args.num_parts).map_err(EngineError::from)?;
    if edges.len() < args.num_parts {
        warn!(
            edges = edges.len(),
            parts = args.num_parts,
            "Fewer edges than parts; some parts will be empty."
        );
    }

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| args.edges.parent().map(PathBuf::from))
        .filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = &output_dir {
        std::fs::create_dir_all(dir)?;
    }

    let stem = file_stem(&args.edges)?;
    for (index, part) in parts.iter().enumerate() {
        let path = output_in(output_dir.as_deref(), format!("{stem}_part_{index}.json"));
        write_edge_list(&path, part)?;
        info!(part = index, edges = part.len(), "Wrote {:?}", path);
    }

    println!(
        "✓ Split {} edge(s) into {} part(s).",
        edges.len(),
        parts.len()
    );
    Ok(())
}
