use crate::backend::{BackendStatus, MilpBackend, StatusClass, create_backend};
use crate::config::SolverConfig;
use crate::error::{DcmstError, Result};
use crate::graph::{DirectedGraph, Graph, transform_to_directed};
use crate::model::{CenterRequirements, ModelBuilderContext, MtzModel, build_model_pipeline};
use crate::solution::{SelectedArc, SolveOutcome, TreeSolution};
use crate::validate::validate_instance;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Values above this count as a selected arc.
const SELECTED_THRESHOLD: f64 = 0.5;

/// Builds the MTZ model of the DCMST instance `(graph, centers)` and solves
/// it with the backend named in `config`.
///
/// Returns [SolveOutcome::BackendUnavailable] without building anything if
/// the backend cannot be created, and [DcmstError::InvalidInput] if the
/// instance is rejected. Infeasibility and time-outs are outcomes, not errors.
pub fn solve_with_mtz(graph: &Graph, centers: &CenterRequirements, config: &SolverConfig) -> Result<SolveOutcome> {
    config.validate()?;
    let mut backend = create_backend(&config.backend, config);
    solve_with_backend(graph, centers, config, backend.as_deref_mut())
}

/// Same as [solve_with_mtz], with the backend supplied by the caller.
///
/// `None` stands for a backend that could not be obtained.
pub fn solve_with_backend<B: MilpBackend + ?Sized>(
    graph: &Graph,
    centers: &CenterRequirements,
    config: &SolverConfig,
    backend: Option<&mut B>,
) -> Result<SolveOutcome> {
    config.validate()?;
    let Some(backend) = backend else {
        warn!(backend = %config.backend, "no solver backend available");
        return Ok(SolveOutcome::BackendUnavailable {
            backend: config.backend.clone(),
        });
    };

    let root = validate_instance(graph, centers, config.root)?;
    let digraph = transform_to_directed(graph);

    let mut ctx = ModelBuilderContext::new(&mut *backend, &digraph, centers, root, config);
    build_model_pipeline(&mut ctx)?;
    let model = ctx.into_model();
    debug!(
        backend = backend.name(),
        root,
        arcs = model.arc_vars.len(),
        labels = model.label_vars.len(),
        constraints = model.num_constraints,
        "built MTZ model"
    );

    backend.set_time_limit(config.time_limit()?);
    let start = Instant::now();
    let status = backend.solve();
    let elapsed = start.elapsed();

    let outcome = match status.classify() {
        StatusClass::Optimal => SolveOutcome::Optimal(extract_tree(&*backend, &digraph, &model, status, elapsed)?),
        StatusClass::Feasible => SolveOutcome::Feasible(extract_tree(&*backend, &digraph, &model, status, elapsed)?),
        StatusClass::NotFound => SolveOutcome::NoSolution { status, elapsed },
    };
    info!(?status, elapsed_secs = elapsed.as_secs_f64(), "{}", outcome.status_message());

    if let Some(tree) = outcome.tree() {
        for violation in tree.violations(graph, centers) {
            warn!(%violation, "solution is not a valid degree-constrained spanning tree");
        }
    }
    Ok(outcome)
}

/// Reads the selected arcs and the labels back from a solved backend.
fn extract_tree<B: MilpBackend + ?Sized>(
    backend: &B,
    digraph: &DirectedGraph,
    model: &MtzModel,
    status: BackendStatus,
    elapsed: Duration,
) -> Result<TreeSolution> {
    let missing = || DcmstError::backend(backend.name(), format!("no value for a variable despite status {status:?}"));

    let mut arcs = Vec::new();
    for (arc, &var) in digraph.arcs().iter().zip(&model.arc_vars) {
        if backend.value(var).ok_or_else(missing)? > SELECTED_THRESHOLD {
            arcs.push(SelectedArc {
                tail: arc.tail,
                head: arc.head,
                weight: arc.weight(),
            });
        }
    }

    let mut labels = std::collections::BTreeMap::new();
    for (&v, &var) in &model.label_vars {
        labels.insert(v, backend.value(var).ok_or_else(missing)?.round() as i64);
    }

    Ok(TreeSolution {
        root: model.root,
        objective: arcs.iter().map(|a| a.weight).sum(),
        arcs,
        labels,
        backend_objective: backend.objective_value(),
        status,
        elapsed,
    })
}
