//! MTZ vertex labels.
//!
//! The root is labeled 0, every other vertex gets a label in `[1, n]`, and
//! for every arc `u -> v`
//!
//! ```text
//! label(u) - label(v) + n * y(u, v) <= n - 1
//! ```
//!
//! A selected arc forces `label(u) < label(v)`, so labels strictly increase
//! along selected paths and no selected directed cycle can exist. An
//! unselected arc leaves `label(u) - label(v) <= n - 1`, which any labeling
//! within the domains satisfies.
use super::model_context::ModelBuilderContext;
use crate::backend::{LinearExpr, MilpBackend};
use crate::error::Result;

pub fn add_label_variables<B: MilpBackend + ?Sized>(ctx: &mut ModelBuilderContext<'_, B>) {
    let n = ctx.num_vertices() as i64;
    for v in ctx.digraph.vertices() {
        let (lower, upper) = if v == ctx.root { (0, 0) } else { (1, n) };
        let var = ctx.backend.new_int_var(lower, upper, &format!("label_{v}"));
        ctx.label_vars.insert(v, var);
    }
}

pub fn add_mtz_constraints<B: MilpBackend + ?Sized>(ctx: &mut ModelBuilderContext<'_, B>) -> Result<()> {
    let n = ctx.num_vertices() as f64;
    let digraph = ctx.digraph;
    for (a, arc) in digraph.arcs().iter().enumerate() {
        let expr = LinearExpr::from(ctx.label_vars[&arc.tail]) - ctx.label_vars[&arc.head]
            + LinearExpr::term(n, ctx.arc_vars[a]);
        ctx.add(expr.at_most(n - 1.0))?;
    }
    Ok(())
}
