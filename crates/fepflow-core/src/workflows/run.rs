use crate::core::models::compound::{Compound, CompoundSet};
use crate::core::models::edge::{Edge, EdgeRecord};
use crate::core::models::leg::Leg;
use crate::core::validation::ValidationError;
use crate::engine::collaborators::{CollaboratorError, LegRequest};
use crate::engine::context::PipelineContext;
use crate::engine::error::EngineError;
use crate::engine::progress::Progress;
use crate::engine::store::ResultStore;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Stages per edge: the atom core plus one per leg.
const STAGES_PER_EDGE: u64 = 1 + Leg::ALL.len() as u64;

/// What a single stage did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Computed,
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub edges: usize,
    pub cores_computed: usize,
    pub cores_reused: usize,
    pub legs_computed: usize,
    pub legs_skipped: usize,
}

/// Drives every edge of `edges` to completion against the document at `output_path`.
///
/// Work already recorded in the document is skipped, so an interrupted run resumes
/// where it stopped. Compounds are resolved and prepared before the document is
/// touched; the first failing stage aborts the run with everything before it persisted.
#[instrument(skip_all, name = "pipeline_workflow", fields(output = %output_path.display()))]
pub fn run(
    output_path: &Path,
    edges: &[Edge],
    compounds: &CompoundSet,
    ctx: &PipelineContext,
) -> Result<PipelineSummary, EngineError> {
    // === Phase 1: Pre-flight ===
    ctx.reporter.report(Progress::PhaseStart { name: "Pre-flight" });
    let prepared = prepare_compounds(edges, compounds, &ctx.config.property_aliases)?;
    info!(
        edges = edges.len(),
        compounds = prepared.len(),
        "Resolved all compounds referenced by the edge list."
    );
    ctx.reporter.report(Progress::PhaseFinish);

    // === Phase 2: Open the result store ===
    ctx.reporter.report(Progress::PhaseStart {
        name: "Result Store",
    });
    let mut store = ResultStore::load_or_init(output_path, &ctx.config.params)?;
    ctx.reporter.report(Progress::PhaseFinish);

    // === Phase 3: Cores and legs ===
    ctx.reporter.report(Progress::PhaseStart { name: "Edges" });
    ctx.reporter.report(Progress::TaskStart {
        total: edges.len() as u64 * STAGES_PER_EDGE,
    });

    let mut summary = PipelineSummary {
        edges: edges.len(),
        ..Default::default()
    };
    for edge in edges {
        let (a, b) = lookup_pair(&prepared, edge)?;
        ctx.reporter.report(Progress::StatusUpdate {
            text: format!("{edge}: atom core"),
        });

        match ensure_core(&mut store, ctx, a, b)? {
            StageOutcome::Computed => summary.cores_computed += 1,
            StageOutcome::Skipped => summary.cores_reused += 1,
        }
        ctx.reporter.report(Progress::TaskIncrement { amount: 1 });

        for leg in Leg::ALL {
            ctx.reporter.report(Progress::StatusUpdate {
                text: format!("{edge}: {leg} leg"),
            });
            match run_leg(&mut store, ctx, a, b, leg)? {
                StageOutcome::Computed => summary.legs_computed += 1,
                StageOutcome::Skipped => summary.legs_skipped += 1,
            }
            ctx.reporter.report(Progress::TaskIncrement { amount: 1 });
        }
    }

    ctx.reporter.report(Progress::TaskFinish);
    ctx.reporter.report(Progress::PhaseFinish);

    info!(
        complete = store
            .document()
            .records()
            .filter(|record| record.is_complete())
            .count(),
        stored = store.document().len(),
        cores_computed = summary.cores_computed,
        cores_reused = summary.cores_reused,
        legs_computed = summary.legs_computed,
        legs_skipped = summary.legs_skipped,
        "Pipeline finished."
    );
    Ok(summary)
}

/// Makes sure the edge `(a, b)` has an atom core, computing and persisting one if not.
///
/// The mapper's first candidate is taken and checked against both compounds' atom
/// counts before it is stored.
#[instrument(skip_all, fields(mol_a = %a.name, mol_b = %b.name))]
pub fn ensure_core(
    store: &mut ResultStore,
    ctx: &PipelineContext,
    a: &Compound,
    b: &Compound,
) -> Result<StageOutcome, EngineError> {
    let edge = Edge::new(a.name.as_str(), b.name.as_str());
    let existing = store.record(&edge).cloned();
    if existing.as_ref().is_some_and(|r| r.core.is_some()) {
        debug!("Reusing stored atom core.");
        return Ok(StageOutcome::Skipped);
    }

    let external = |source: CollaboratorError| EngineError::ExternalComputation {
        stage: "atom mapping".to_string(),
        edge: edge.clone(),
        source,
    };
    let candidates = ctx
        .mapper
        .map_atoms(a, b, &ctx.config.mapping)
        .map_err(external)?;
    debug!(candidates = candidates.len(), "Atom mapper returned candidates.");
    let core = candidates
        .into_iter()
        .next()
        .ok_or_else(|| external(CollaboratorError::NoCandidates))?;
    core.check_bounds((a.name.as_str(), a.num_atoms), (b.name.as_str(), b.num_atoms))?;

    let mut record = existing.unwrap_or_else(|| EdgeRecord::new(&edge));
    info!(core_size = core.len(), "Computed atom core.");
    record.core = Some(core);
    store.upsert(record)?;
    Ok(StageOutcome::Computed)
}

/// Computes and persists `leg` for the edge `(a, b)` unless it is already recorded.
///
/// The edge must already have a core. The receptor structure is only handed to the
/// runner for the complex leg.
#[instrument(skip_all, fields(mol_a = %a.name, mol_b = %b.name, leg = %leg))]
pub fn run_leg(
    store: &mut ResultStore,
    ctx: &PipelineContext,
    a: &Compound,
    b: &Compound,
    leg: Leg,
) -> Result<StageOutcome, EngineError> {
    let edge = Edge::new(a.name.as_str(), b.name.as_str());
    let mut record = store.record(&edge).cloned().ok_or_else(|| {
        EngineError::DataIntegrity(format!("edge {edge} has no record; compute its core first"))
    })?;
    if record.has_leg(leg) {
        debug!("Leg already recorded, skipping.");
        return Ok(StageOutcome::Skipped);
    }

    let result = {
        let core = record.core.as_ref().ok_or_else(|| {
            EngineError::DataIntegrity(format!("edge {edge} has no atom core"))
        })?;
        let params = store.params();
        let request = LegRequest {
            leg,
            compound_a: a,
            compound_b: b,
            core,
            forcefield: ctx.forcefield,
            receptor: if leg.uses_receptor() {
                ctx.config.receptor_path.as_deref()
            } else {
                None
            },
            md_params: &params.md_params,
            max_windows: params.max_windows,
            min_overlap: params.min_overlap,
        };

        info!("Running leg.");
        ctx.runner
            .run_leg(&request)
            .and_then(|output| output.summarize())
            .map_err(|source| EngineError::ExternalComputation {
                stage: format!("{leg} leg"),
                edge: edge.clone(),
                source,
            })?
    };

    info!(
        pred_ddg = result.pred_ddg,
        pred_ddg_err = result.pred_ddg_err,
        windows = result.windows,
        min_overlap = result.min_overlap,
        "Leg finished."
    );
    record.set_leg(leg, result);
    store.upsert(record)?;
    Ok(StageOutcome::Computed)
}

/// Resolves every compound the edges reference and applies the property aliases.
///
/// Only referenced compounds are kept, in order of first reference.
fn prepare_compounds(
    edges: &[Edge],
    compounds: &CompoundSet,
    aliases: &BTreeMap<String, String>,
) -> Result<CompoundSet, EngineError> {
    if edges.is_empty() {
        return Err(ValidationError::EmptyEdgeList.into());
    }

    let mut prepared = CompoundSet::new();
    let mut seen = HashSet::new();
    for (index, edge) in edges.iter().enumerate() {
        if edge.is_self_edge() {
            return Err(ValidationError::SelfEdge {
                index,
                name: edge.mol_a.clone(),
            }
            .into());
        }
        if !seen.insert(edge) {
            warn!(%edge, "Edge is listed more than once; later occurrences are no-ops.");
        }
        for name in [&edge.mol_a, &edge.mol_b] {
            if prepared.contains(name) {
                continue;
            }
            let mut compound = compounds
                .get(name)
                .cloned()
                .ok_or_else(|| EngineError::Lookup { name: name.clone() })?;
            for (target, source) in aliases {
                compound.alias_property(target, source)?;
            }
            prepared.insert(compound)?;
        }
    }
    Ok(prepared)
}

fn lookup_pair<'s>(
    compounds: &'s CompoundSet,
    edge: &Edge,
) -> Result<(&'s Compound, &'s Compound), EngineError> {
    let get = |name: &String| {
        compounds
            .get(name)
            .ok_or_else(|| EngineError::Lookup { name: name.clone() })
    };
    Ok((get(&edge.mol_a)?, get(&edge.mol_b)?))
}
