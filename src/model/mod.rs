//! MTZ model of the degree-constrained minimum spanning tree problem.
//!
//! Variables:
//! * `y(u, v)`, boolean, one per arc of the directionalized graph;
//! * `label(v)`, integer, `0` for the root and `[1, n]` otherwise.
//!
//! Objective: minimize the weight of the selected arcs. Constraints: MTZ
//! cycle elimination ([model_labels]), center minimum degrees, leaf degrees
//! and the single-parent rule ([model_degrees]).

mod model_arcs;
mod model_context;
mod model_degrees;
mod model_labels;
mod mtz_solve;

use crate::graph::VertexId;
use std::collections::BTreeMap;

pub use model_context::{ModelBuilderContext, MtzModel, build_model_pipeline};
pub use mtz_solve::{solve_with_backend, solve_with_mtz};

/// Minimum degree of every center vertex. Vertices not listed must be leaves.
pub type CenterRequirements = BTreeMap<VertexId, u32>;
