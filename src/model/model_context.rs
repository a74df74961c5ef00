//! Shared state of the MTZ model while it is being built.
use super::model_arcs::{add_arc_variables, add_objective};
use super::model_degrees::{add_center_degree_constraints, add_leaf_constraints, add_single_parent_constraints};
use super::model_labels::{add_label_variables, add_mtz_constraints};
use super::CenterRequirements;
use crate::backend::{LinearConstraint, LinearExpr, MilpBackend, VarId};
use crate::config::{DegreeRule, SolverConfig};
use crate::error::Result;
use crate::graph::{DirectedGraph, VertexId};
use std::collections::BTreeMap;

/// Everything the constraint builders need: the backend receiving the model,
/// the directed graph and center requirements it is built from, and the
/// variables created so far.
pub struct ModelBuilderContext<'a, B: MilpBackend + ?Sized> {
    pub backend: &'a mut B,
    pub digraph: &'a DirectedGraph,
    pub centers: &'a CenterRequirements,
    pub root: VertexId,
    pub degree_rule: DegreeRule,
    pub single_parent: bool,
    /// One variable per arc, indexed like `digraph.arcs()`.
    pub arc_vars: Vec<VarId>,
    pub label_vars: BTreeMap<VertexId, VarId>,
    pub num_constraints: usize,
}

/// Variables of a built model, kept to read the solution back.
#[derive(Debug, Clone)]
pub struct MtzModel {
    pub root: VertexId,
    pub arc_vars: Vec<VarId>,
    pub label_vars: BTreeMap<VertexId, VarId>,
    pub num_constraints: usize,
}

impl<'a, B: MilpBackend + ?Sized> ModelBuilderContext<'a, B> {
    pub fn new(
        backend: &'a mut B,
        digraph: &'a DirectedGraph,
        centers: &'a CenterRequirements,
        root: VertexId,
        config: &SolverConfig,
    ) -> Self {
        Self {
            backend,
            digraph,
            centers,
            root,
            degree_rule: config.degree_rule,
            single_parent: config.single_parent,
            arc_vars: Vec::with_capacity(digraph.num_arcs()),
            label_vars: BTreeMap::new(),
            num_constraints: 0,
        }
    }

    /// |V|, the big-M of the MTZ constraints and the largest label.
    pub fn num_vertices(&self) -> usize {
        self.digraph.num_vertices()
    }

    pub fn add(&mut self, constraint: LinearConstraint) -> Result<()> {
        self.backend.add_constraint(constraint)?;
        self.num_constraints += 1;
        Ok(())
    }

    /// Sum of the arc variables entering `vertex`.
    pub fn in_sum(&self, vertex: VertexId) -> LinearExpr {
        LinearExpr::sum(self.digraph.in_arcs(vertex).iter().map(|&a| self.arc_vars[a]))
    }

    /// Sum of the arc variables leaving `vertex`.
    pub fn out_sum(&self, vertex: VertexId) -> LinearExpr {
        LinearExpr::sum(self.digraph.out_arcs(vertex).iter().map(|&a| self.arc_vars[a]))
    }

    /// Sum of all arc variables touching `vertex`, i.e. its tree degree.
    pub fn incident_sum(&self, vertex: VertexId) -> LinearExpr {
        self.in_sum(vertex) + self.out_sum(vertex)
    }

    pub fn into_model(self) -> MtzModel {
        MtzModel {
            root: self.root,
            arc_vars: self.arc_vars,
            label_vars: self.label_vars,
            num_constraints: self.num_constraints,
        }
    }
}

/// Runs every builder step on `ctx`, in dependency order.
pub fn build_model_pipeline<B: MilpBackend + ?Sized>(ctx: &mut ModelBuilderContext<'_, B>) -> Result<()> {
    add_arc_variables(ctx);
    add_objective(ctx)?;
    add_label_variables(ctx);
    add_mtz_constraints(ctx)?;
    add_center_degree_constraints(ctx)?;
    add_leaf_constraints(ctx)?;
    if ctx.single_parent {
        add_single_parent_constraints(ctx)?;
    }
    Ok(())
}
