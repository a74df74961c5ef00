//! Arc selection variables and the objective.
use super::model_context::ModelBuilderContext;
use crate::backend::{LinearExpr, MilpBackend};
use crate::error::Result;

/// Creates one boolean `y_{u}_{v}` per arc `u -> v`.
pub fn add_arc_variables<B: MilpBackend + ?Sized>(ctx: &mut ModelBuilderContext<'_, B>) {
    for arc in ctx.digraph.arcs() {
        let var = ctx.backend.new_bool_var(&format!("y_{}_{}", arc.tail, arc.head));
        ctx.arc_vars.push(var);
    }
}

/// Minimize the total weight of the selected arcs.
pub fn add_objective<B: MilpBackend + ?Sized>(ctx: &mut ModelBuilderContext<'_, B>) -> Result<()> {
    let objective: LinearExpr = ctx
        .digraph
        .arcs()
        .iter()
        .zip(&ctx.arc_vars)
        .map(|(arc, &var)| (arc.weight(), var))
        .collect();
    ctx.backend.minimize(objective)
}
