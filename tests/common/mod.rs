#![allow(dead_code)]

use dcmst_mtz::backend::{BackendStatus, LinearConstraint, LinearExpr, MilpBackend, VarId};
use dcmst_mtz::{CenterRequirements, Graph, Result};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedVar {
    pub name: String,
    pub lower: i64,
    pub upper: i64,
}

/// Backend that records the model and answers `solve` with a scripted status
/// and assignment (by variable name, unnamed variables read as 0).
#[derive(Debug)]
pub struct RecordingBackend {
    pub vars: Vec<RecordedVar>,
    pub constraints: Vec<LinearConstraint>,
    pub objective: Option<LinearExpr>,
    pub time_limit: Option<Duration>,
    pub solve_calls: usize,
    pub status: BackendStatus,
    pub assignment: HashMap<String, f64>,
}

impl RecordingBackend {
    pub fn new(status: BackendStatus) -> Self {
        Self {
            vars: Vec::new(),
            constraints: Vec::new(),
            objective: None,
            time_limit: None,
            solve_calls: 0,
            status,
            assignment: HashMap::new(),
        }
    }

    pub fn with_assignment<'a>(mut self, values: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        self.assignment = values.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        self
    }

    pub fn var_named(&self, name: &str) -> Option<VarId> {
        self.vars.iter().position(|v| v.name == name).map(VarId)
    }

    pub fn assigned(&self, var: VarId) -> f64 {
        self.assignment.get(&self.vars[var.0].name).copied().unwrap_or(0.0)
    }

    /// Constraints violated by the scripted assignment.
    pub fn violated(&self) -> Vec<&LinearConstraint> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied_by(|v| self.assigned(v)))
            .collect()
    }

    pub fn count_named(&self, prefix: &str) -> usize {
        self.vars.iter().filter(|v| v.name.starts_with(prefix)).count()
    }
}

impl MilpBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn new_bool_var(&mut self, name: &str) -> VarId {
        self.new_int_var(0, 1, name)
    }

    fn new_int_var(&mut self, lower: i64, upper: i64, name: &str) -> VarId {
        self.vars.push(RecordedVar {
            name: name.to_string(),
            lower,
            upper,
        });
        VarId(self.vars.len() - 1)
    }

    fn add_constraint(&mut self, constraint: LinearConstraint) -> Result<()> {
        self.constraints.push(constraint);
        Ok(())
    }

    fn minimize(&mut self, objective: LinearExpr) -> Result<()> {
        self.objective = Some(objective);
        Ok(())
    }

    fn set_time_limit(&mut self, limit: Duration) {
        self.time_limit = Some(limit);
    }

    fn solve(&mut self) -> BackendStatus {
        self.solve_calls += 1;
        self.status
    }

    fn value(&self, var: VarId) -> Option<f64> {
        self.status.has_solution().then(|| self.assigned(var))
    }

    fn objective_value(&self) -> Option<f64> {
        let objective = self.objective.as_ref()?;
        self.status
            .has_solution()
            .then(|| objective.evaluate(|v| self.assigned(v)))
    }
}

/// Cycle 0 - 1 - 2 - 3 - 0 with unit weights.
pub fn four_cycle() -> Graph {
    Graph::from_weighted_edges([(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 0, 1.0)])
}

/// Hub 0 joined to leaves 1..=4 with unit weights.
pub fn star() -> Graph {
    Graph::from_weighted_edges((1..=4).map(|leaf| (0, leaf, 1.0)))
}

/// Two hubs 0 and 1 each with three private leaves, hubs joined directly
/// (weight 5) and through every leaf of the other hub (weight 1).
pub fn two_hubs() -> Graph {
    let mut g = Graph::new();
    g.add_edge(0, 1, 5.0);
    for leaf in 2..=4 {
        g.add_edge(0, leaf, 1.0);
        g.add_edge(1, leaf, 3.0);
    }
    for leaf in 5..=7 {
        g.add_edge(1, leaf, 1.0);
        g.add_edge(0, leaf, 3.0);
    }
    g
}

pub fn centers<const N: usize>(entries: [(u32, u32); N]) -> CenterRequirements {
    CenterRequirements::from(entries)
}
