//! Solver backends.
//!
//! The MTZ model is written against [MilpBackend], a small capability trait
//! covering variable creation, linear constraints, a linear objective, a time
//! limit and solving. Expressions are solver-neutral ([LinearExpr],
//! [LinearConstraint]) and translated by each backend.
//!
//! Backends are obtained by name through [create_backend]. The CP-SAT backend
//! is compiled in with the `cp-sat` feature (on by default).

#[cfg(feature = "cp-sat")]
pub mod cp_sat;

use crate::config::SolverConfig;
use crate::error::Result;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::time::Duration;
use tracing::warn;

/// Handle of a variable created by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub usize);

// =#========================================================================#=
// LINEAR EXPRESSIONS
// =#========================================================================#=
/// Affine expression `sum(coef * var) + constant`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(f64, VarId)>,
    constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(coef: f64, var: VarId) -> Self {
        Self {
            terms: vec![(coef, var)],
            constant: 0.0,
        }
    }

    /// Sum of `vars`, each with coefficient 1.
    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        vars.into_iter().map(|v| (1.0, v)).collect()
    }

    pub fn add_term(&mut self, coef: f64, var: VarId) {
        self.terms.push((coef, var));
    }

    pub fn terms(&self) -> &[(f64, VarId)] {
        &self.terms
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Value of the expression under `value_of`.
    pub fn evaluate(&self, value_of: impl Fn(VarId) -> f64) -> f64 {
        self.terms.iter().map(|&(c, v)| c * value_of(v)).sum::<f64>() + self.constant
    }

    pub fn at_most(self, rhs: f64) -> LinearConstraint {
        LinearConstraint::new(self, Sense::Le, rhs)
    }

    pub fn at_least(self, rhs: f64) -> LinearConstraint {
        LinearConstraint::new(self, Sense::Ge, rhs)
    }

    pub fn equal_to(self, rhs: f64) -> LinearConstraint {
        LinearConstraint::new(self, Sense::Eq, rhs)
    }
}

impl From<VarId> for LinearExpr {
    fn from(var: VarId) -> Self {
        Self::term(1.0, var)
    }
}

impl From<f64> for LinearExpr {
    fn from(constant: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant,
        }
    }
}

impl FromIterator<(f64, VarId)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (f64, VarId)>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
            constant: 0.0,
        }
    }
}

impl<T: Into<LinearExpr>> Add<T> for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: T) -> LinearExpr {
        let rhs = rhs.into();
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
        self
    }
}

impl<T: Into<LinearExpr>> Sub<T> for LinearExpr {
    type Output = LinearExpr;

    fn sub(self, rhs: T) -> LinearExpr {
        let rhs: LinearExpr = rhs.into();
        self + (-rhs)
    }
}

impl Neg for LinearExpr {
    type Output = LinearExpr;

    fn neg(self) -> LinearExpr {
        self * -1.0
    }
}

impl Mul<f64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(mut self, factor: f64) -> LinearExpr {
        for (c, _) in &mut self.terms {
            *c *= factor;
        }
        self.constant *= factor;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Le,
    Ge,
    Eq,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sense::Le => "<=",
            Sense::Ge => ">=",
            Sense::Eq => "==",
        })
    }
}

/// Constraint `expr (<=|>=|==) rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    pub expr: LinearExpr,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinearConstraint {
    /// Tolerance used by [LinearConstraint::is_satisfied_by].
    pub const TOLERANCE: f64 = 1e-6;

    pub fn new(expr: LinearExpr, sense: Sense, rhs: f64) -> Self {
        Self { expr, sense, rhs }
    }

    /// Right-hand side once the expression constant is moved across.
    pub fn normalized_rhs(&self) -> f64 {
        self.rhs - self.expr.constant()
    }

    pub fn is_satisfied_by(&self, value_of: impl Fn(VarId) -> f64) -> bool {
        let lhs = self.expr.evaluate(value_of);
        match self.sense {
            Sense::Le => lhs <= self.rhs + Self::TOLERANCE,
            Sense::Ge => lhs >= self.rhs - Self::TOLERANCE,
            Sense::Eq => (lhs - self.rhs).abs() <= Self::TOLERANCE,
        }
    }
}

// =#========================================================================#=
// STATUS
// =#========================================================================#=
/// Terminal status reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendStatus {
    Optimal,
    Feasible,
    Infeasible,
    Unbounded,
    /// Stopped (usually at the time limit) without any solution.
    NotSolved,
    ModelInvalid,
}

/// Tri-state classification of a [BackendStatus].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Optimal,
    Feasible,
    NotFound,
}

impl BackendStatus {
    pub fn classify(self) -> StatusClass {
        match self {
            BackendStatus::Optimal => StatusClass::Optimal,
            BackendStatus::Feasible => StatusClass::Feasible,
            _ => StatusClass::NotFound,
        }
    }

    pub fn has_solution(self) -> bool {
        self.classify() != StatusClass::NotFound
    }
}

// =#========================================================================#=
// BACKEND TRAIT
// =#========================================================================#=
/// MILP solver capability used by the model builder.
pub trait MilpBackend {
    /// Name of the backend, e.g. `"cp-sat"`.
    fn name(&self) -> &str;

    fn new_bool_var(&mut self, name: &str) -> VarId;

    /// Integer variable with the inclusive domain `[lower, upper]`.
    fn new_int_var(&mut self, lower: i64, upper: i64, name: &str) -> VarId;

    fn add_constraint(&mut self, constraint: LinearConstraint) -> Result<()>;

    fn minimize(&mut self, objective: LinearExpr) -> Result<()>;

    fn set_time_limit(&mut self, limit: Duration);

    /// Solves the model built so far. Blocks until done or out of time.
    fn solve(&mut self) -> BackendStatus;

    /// Value of `var` in the last solution, if there is one.
    fn value(&self, var: VarId) -> Option<f64>;

    /// Objective value of the last solution, in unscaled units.
    fn objective_value(&self) -> Option<f64>;
}

/// Creates the backend registered under `name` (case-insensitive).
///
/// Returns `None` for unknown names and for backends not compiled in.
pub fn create_backend(name: &str, config: &SolverConfig) -> Option<Box<dyn MilpBackend>> {
    match name.to_ascii_lowercase().as_str() {
        "cp-sat" | "cpsat" | "cp_sat" => cp_sat_backend(config),
        other => {
            warn!(backend = other, "unknown solver backend");
            None
        }
    }
}

#[cfg(feature = "cp-sat")]
fn cp_sat_backend(config: &SolverConfig) -> Option<Box<dyn MilpBackend>> {
    Some(Box::new(self::cp_sat::CpSatBackend::new(config)))
}

#[cfg(not(feature = "cp-sat"))]
fn cp_sat_backend(_config: &SolverConfig) -> Option<Box<dyn MilpBackend>> {
    warn!("cp-sat backend requested but the `cp-sat` feature is disabled");
    None
}
