//! CP-SAT backend built on the `cp_sat` bindings.
//!
//! CP-SAT only handles integral coefficients. Constraint coefficients must
//! already be integers; objective coefficients are multiplied by
//! `objective_scale` and rounded.

use super::{BackendStatus, LinearConstraint, LinearExpr, MilpBackend, Sense, VarId};
use crate::config::SolverConfig;
use crate::error::{DcmstError, Result};
use cp_sat::builder::{CpModelBuilder, IntVar, LinearExpr as CpLinearExpr};
use cp_sat::proto::{CpSolverResponse, CpSolverStatus, SatParameters};
use std::time::Duration;
use tracing::{debug, warn};

const NAME: &str = "cp-sat";

/// Largest deviation from an integer still accepted as integral.
const INTEGRALITY_TOLERANCE: f64 = 1e-9;

pub struct CpSatBackend {
    model: CpModelBuilder,
    vars: Vec<IntVar>,
    params: SatParameters,
    objective_scale: f64,
    objective_offset: f64,
    response: Option<CpSolverResponse>,
}

impl CpSatBackend {
    pub fn new(config: &SolverConfig) -> Self {
        let mut params = SatParameters::default();
        params.max_time_in_seconds = Some(config.time_limit_secs);
        params.num_search_workers = config.num_workers;
        params.random_seed = config.random_seed;
        params.log_search_progress = Some(config.log_search_progress);

        Self {
            model: CpModelBuilder::default(),
            vars: Vec::new(),
            params,
            objective_scale: config.objective_scale,
            objective_offset: 0.0,
            response: None,
        }
    }

    fn push_var(&mut self, var: IntVar) -> VarId {
        self.vars.push(var);
        VarId(self.vars.len() - 1)
    }

    fn var(&self, id: VarId) -> Result<IntVar> {
        self.vars
            .get(id.0)
            .cloned()
            .ok_or_else(|| DcmstError::backend(NAME, format!("unknown variable {}", id.0)))
    }

    /// Converts the terms of `expr`, scaled by `scale`, into a CP-SAT expression.
    fn convert_terms(&self, expr: &LinearExpr, scale: f64, lossy: bool) -> Result<CpLinearExpr> {
        let mut terms = Vec::with_capacity(expr.terms().len());
        for &(coef, id) in expr.terms() {
            let scaled = coef * scale;
            let c = if lossy {
                rounded(scaled)?
            } else {
                integral(scaled).ok_or_else(|| {
                    DcmstError::backend(NAME, format!("non-integral coefficient {coef}"))
                })?
            };
            terms.push((c, self.var(id)?));
        }
        Ok(terms.into_iter().collect())
    }

    /// Status of the last response, mapped onto [BackendStatus].
    fn last_status(&self) -> Option<BackendStatus> {
        self.response.as_ref().map(|r| match r.status() {
            CpSolverStatus::Optimal => BackendStatus::Optimal,
            CpSolverStatus::Feasible => BackendStatus::Feasible,
            CpSolverStatus::Infeasible => BackendStatus::Infeasible,
            CpSolverStatus::ModelInvalid => BackendStatus::ModelInvalid,
            CpSolverStatus::Unknown => BackendStatus::NotSolved,
        })
    }

    fn solved_response(&self) -> Option<&CpSolverResponse> {
        match self.last_status() {
            Some(status) if status.has_solution() => self.response.as_ref(),
            _ => None,
        }
    }
}

fn integral(value: f64) -> Option<i64> {
    let r = value.round();
    ((value - r).abs() <= INTEGRALITY_TOLERANCE && r.abs() < i64::MAX as f64).then_some(r as i64)
}

fn rounded(value: f64) -> Result<i64> {
    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return Err(DcmstError::backend(NAME, format!("objective coefficient {value} out of range")));
    }
    if integral(value).is_none() {
        warn!(coefficient = value, "objective coefficient rounded; raise objective_scale for more precision");
    }
    Ok(value.round() as i64)
}

impl MilpBackend for CpSatBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn new_bool_var(&mut self, name: &str) -> VarId {
        let var = self.model.new_bool_var_with_name(name);
        self.push_var(IntVar::from(var))
    }

    fn new_int_var(&mut self, lower: i64, upper: i64, name: &str) -> VarId {
        let var = self.model.new_int_var_with_name([(lower, upper)], name);
        self.push_var(var)
    }

    fn add_constraint(&mut self, constraint: LinearConstraint) -> Result<()> {
        let lhs = self.convert_terms(&constraint.expr, 1.0, false)?;
        let rhs = integral(constraint.normalized_rhs()).ok_or_else(|| {
            DcmstError::backend(NAME, format!("non-integral bound {}", constraint.rhs))
        })?;
        match constraint.sense {
            Sense::Le => self.model.add_le(lhs, CpLinearExpr::from(rhs)),
            Sense::Ge => self.model.add_ge(lhs, CpLinearExpr::from(rhs)),
            Sense::Eq => self.model.add_eq(lhs, CpLinearExpr::from(rhs)),
        };
        Ok(())
    }

    fn minimize(&mut self, objective: LinearExpr) -> Result<()> {
        // Constant kept aside; objective_value adds it back.
        let expr = self.convert_terms(&objective, self.objective_scale, true)?;
        self.objective_offset = objective.constant();
        self.model.minimize(expr);
        Ok(())
    }

    fn set_time_limit(&mut self, limit: Duration) {
        self.params.max_time_in_seconds = Some(limit.as_secs_f64());
    }

    fn solve(&mut self) -> BackendStatus {
        let response = self.model.solve_with_parameters(&self.params);
        debug!(
            wall_time = response.wall_time,
            objective = response.objective_value,
            "cp-sat finished"
        );
        self.response = Some(response);
        self.last_status().unwrap_or(BackendStatus::NotSolved)
    }

    fn value(&self, var: VarId) -> Option<f64> {
        let response = self.solved_response()?;
        let var = self.vars.get(var.0)?.clone();
        Some(var.solution_value(response) as f64)
    }

    fn objective_value(&self) -> Option<f64> {
        self.solved_response()
            .map(|r| r.objective_value / self.objective_scale + self.objective_offset)
    }
}
