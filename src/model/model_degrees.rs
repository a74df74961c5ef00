//! Degree constraints: minimum degree of centers, exact degree 1 of leaves,
//! and the single-parent rule that turns the selection into an arborescence.
use super::model_context::ModelBuilderContext;
use crate::backend::MilpBackend;
use crate::config::DegreeRule;
use crate::error::Result;

/// Every center `v` must reach its required degree `d[v]`.
///
/// With [DegreeRule::Total] the selected arcs touching `v` must number at
/// least `d[v]`. With [DegreeRule::InAndOut] the in-arcs and the out-arcs
/// must each reach `d[v]` on their own.
pub fn add_center_degree_constraints<B: MilpBackend + ?Sized>(ctx: &mut ModelBuilderContext<'_, B>) -> Result<()> {
    let (centers, rule) = (ctx.centers, ctx.degree_rule);
    for (&v, &required) in centers {
        let required = f64::from(required);
        match rule {
            DegreeRule::Total => {
                let degree = ctx.incident_sum(v);
                ctx.add(degree.at_least(required))?;
            }
            DegreeRule::InAndOut => {
                let inflow = ctx.in_sum(v);
                ctx.add(inflow.at_least(required))?;
                let outflow = ctx.out_sum(v);
                ctx.add(outflow.at_least(required))?;
            }
        }
    }
    Ok(())
}

/// Every vertex that is not a center is a leaf: exactly one selected arc touches it.
///
/// A lone vertex is already its own spanning tree and gets no leaf constraint.
pub fn add_leaf_constraints<B: MilpBackend + ?Sized>(ctx: &mut ModelBuilderContext<'_, B>) -> Result<()> {
    if ctx.num_vertices() < 2 {
        return Ok(());
    }
    let (digraph, centers) = (ctx.digraph, ctx.centers);
    for v in digraph.vertices().filter(|v| !centers.contains_key(v)) {
        let degree = ctx.incident_sum(v);
        ctx.add(degree.equal_to(1.0))?;
    }
    Ok(())
}

/// The root has no selected in-arc; every other vertex has exactly one.
pub fn add_single_parent_constraints<B: MilpBackend + ?Sized>(ctx: &mut ModelBuilderContext<'_, B>) -> Result<()> {
    let digraph = ctx.digraph;
    for v in digraph.vertices() {
        let parents = if v == ctx.root { 0.0 } else { 1.0 };
        let inflow = ctx.in_sum(v);
        ctx.add(inflow.equal_to(parents))?;
    }
    Ok(())
}
