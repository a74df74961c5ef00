//! Solve outcomes and recovered trees.

use crate::backend::BackendStatus;
use crate::graph::{Graph, VertexId};
use crate::model::CenterRequirements;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

pub const OPTIMAL_MESSAGE: &str = "Optimal solution found.";
pub const FEASIBLE_MESSAGE: &str = "Feasible solution found, but it may not be optimal.";
pub const NOT_FOUND_MESSAGE: &str = "Solution not found.";
pub const UNAVAILABLE_MESSAGE: &str = "Solver backend unavailable.";

/// Result of one MTZ solve.
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    /// Proven optimal tree.
    Optimal(TreeSolution),
    /// Tree found, optimality not proven (usually out of time).
    Feasible(TreeSolution),
    /// Infeasible, unbounded, or out of time without any tree.
    NoSolution {
        status: BackendStatus,
        elapsed: Duration,
    },
    /// No backend could be created; nothing was built.
    BackendUnavailable { backend: String },
}

impl SolveOutcome {
    pub fn status_message(&self) -> &'static str {
        match self {
            SolveOutcome::Optimal(_) => OPTIMAL_MESSAGE,
            SolveOutcome::Feasible(_) => FEASIBLE_MESSAGE,
            SolveOutcome::NoSolution { .. } => NOT_FOUND_MESSAGE,
            SolveOutcome::BackendUnavailable { .. } => UNAVAILABLE_MESSAGE,
        }
    }

    /// Short machine-readable tag.
    pub fn kind(&self) -> &'static str {
        match self {
            SolveOutcome::Optimal(_) => "optimal",
            SolveOutcome::Feasible(_) => "feasible",
            SolveOutcome::NoSolution { .. } => "no_solution",
            SolveOutcome::BackendUnavailable { .. } => "backend_unavailable",
        }
    }

    /// Wall-clock time of the solver call; `None` if the solver never ran.
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            SolveOutcome::Optimal(tree) | SolveOutcome::Feasible(tree) => Some(tree.elapsed),
            SolveOutcome::NoSolution { elapsed, .. } => Some(*elapsed),
            SolveOutcome::BackendUnavailable { .. } => None,
        }
    }

    pub fn tree(&self) -> Option<&TreeSolution> {
        match self {
            SolveOutcome::Optimal(tree) | SolveOutcome::Feasible(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn into_tree(self) -> Option<TreeSolution> {
        match self {
            SolveOutcome::Optimal(tree) | SolveOutcome::Feasible(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveOutcome::Optimal(_))
    }

    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, SolveOutcome::BackendUnavailable { .. })
    }
}

/// Arc `tail -> head` selected by the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedArc {
    pub tail: VertexId,
    pub head: VertexId,
    pub weight: f64,
}

/// Tree read back from a solved model.
///
/// Arcs are oriented away from the root when the single-parent rule is on.
#[derive(Debug, Clone)]
pub struct TreeSolution {
    pub root: VertexId,
    pub arcs: Vec<SelectedArc>,
    /// MTZ label of every vertex.
    pub labels: BTreeMap<VertexId, i64>,
    /// Sum of the original weights of the selected arcs.
    pub objective: f64,
    /// Objective as reported by the backend, if it reports one.
    pub backend_objective: Option<f64>,
    pub status: BackendStatus,
    pub elapsed: Duration,
}

/// Property of a DCMST that a [TreeSolution] fails to satisfy.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeViolation {
    EdgeNotInGraph { u: VertexId, v: VertexId },
    DuplicateEdge { u: VertexId, v: VertexId },
    EdgeCount { expected: usize, actual: usize },
    NotSpanning { reached: usize, total: usize },
    CenterDegree { vertex: VertexId, required: u32, actual: usize },
    LeafDegree { vertex: VertexId, actual: usize },
    LabelOrder { tail: VertexId, head: VertexId },
}

impl fmt::Display for TreeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeViolation::EdgeNotInGraph { u, v } => write!(f, "edge {{{u}, {v}}} is not in the graph"),
            TreeViolation::DuplicateEdge { u, v } => write!(f, "edge {{{u}, {v}}} selected in both directions"),
            TreeViolation::EdgeCount { expected, actual } => write!(f, "{actual} edges, expected {expected}"),
            TreeViolation::NotSpanning { reached, total } => write!(f, "tree reaches {reached} of {total} vertices"),
            TreeViolation::CenterDegree { vertex, required, actual } => {
                write!(f, "center {vertex} has degree {actual}, requires {required}")
            }
            TreeViolation::LeafDegree { vertex, actual } => write!(f, "leaf {vertex} has degree {actual}"),
            TreeViolation::LabelOrder { tail, head } => write!(f, "label({tail}) >= label({head}) on a selected arc"),
        }
    }
}

impl TreeSolution {
    pub fn num_edges(&self) -> usize {
        self.arcs.len()
    }

    /// Selected arcs as undirected `(min, max, weight)` edges, sorted.
    pub fn edges(&self) -> Vec<(VertexId, VertexId, f64)> {
        let mut edges: Vec<_> = self
            .arcs
            .iter()
            .map(|a| (a.tail.min(a.head), a.tail.max(a.head), a.weight))
            .collect();
        edges.sort_by(|x, y| (x.0, x.1).cmp(&(y.0, y.1)));
        edges
    }

    /// Undirected degree of `vertex` in the tree.
    pub fn degree(&self, vertex: VertexId) -> usize {
        self.arcs
            .iter()
            .filter(|a| a.tail == vertex || a.head == vertex)
            .count()
    }

    pub fn degrees(&self) -> BTreeMap<VertexId, usize> {
        let mut degrees: BTreeMap<VertexId, usize> = self.labels.keys().map(|&v| (v, 0)).collect();
        for a in &self.arcs {
            *degrees.entry(a.tail).or_default() += 1;
            *degrees.entry(a.head).or_default() += 1;
        }
        degrees
    }

    /// Checks the tree against `graph` and `centers`: a spanning tree of the
    /// graph, center and leaf degrees, and increasing labels along arcs.
    pub fn violations(&self, graph: &Graph, centers: &CenterRequirements) -> Vec<TreeViolation> {
        let mut violations = Vec::new();

        let mut tree = Graph::new();
        for v in graph.vertices() {
            tree.add_vertex(v);
        }
        for &(u, v, weight) in &self.edges() {
            if graph.edge(u, v).is_none() {
                violations.push(TreeViolation::EdgeNotInGraph { u, v });
            }
            if tree.edge(u, v).is_some() {
                violations.push(TreeViolation::DuplicateEdge { u, v });
            }
            tree.add_edge(u, v, weight);
        }

        let expected = graph.num_vertices().saturating_sub(1);
        if self.num_edges() != expected {
            violations.push(TreeViolation::EdgeCount { expected, actual: self.num_edges() });
        }
        let reached = tree.reachable_count();
        if reached != tree.num_vertices() {
            violations.push(TreeViolation::NotSpanning { reached, total: tree.num_vertices() });
        }

        for v in graph.vertices() {
            let actual = tree.degree(v);
            match centers.get(&v) {
                Some(&required) if actual < required as usize => {
                    violations.push(TreeViolation::CenterDegree { vertex: v, required, actual });
                }
                None if actual != 1 && graph.num_vertices() > 1 => {
                    violations.push(TreeViolation::LeafDegree { vertex: v, actual });
                }
                _ => {}
            }
        }

        for a in &self.arcs {
            match (self.labels.get(&a.tail), self.labels.get(&a.head)) {
                (Some(lt), Some(lh)) if lt < lh => {}
                _ => violations.push(TreeViolation::LabelOrder { tail: a.tail, head: a.head }),
            }
        }

        violations
    }

    pub fn is_valid(&self, graph: &Graph, centers: &CenterRequirements) -> bool {
        self.violations(graph, centers).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arc(tail: VertexId, head: VertexId) -> SelectedArc {
        SelectedArc { tail, head, weight: 1.0 }
    }

    /// Path 0 - 1 - 2 - 3 rooted at 1: both 1 and 2 are centers of degree 2.
    fn path_tree() -> TreeSolution {
        TreeSolution {
            root: 1,
            arcs: vec![arc(1, 0), arc(1, 2), arc(2, 3)],
            labels: BTreeMap::from([(0, 1), (1, 0), (2, 1), (3, 2)]),
            objective: 3.0,
            backend_objective: Some(3.0),
            status: BackendStatus::Optimal,
            elapsed: Duration::from_millis(5),
        }
    }

    fn path_graph() -> Graph {
        Graph::from_weighted_edges([(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 0, 1.0)])
    }

    #[test]
    fn valid_tree_has_no_violations() {
        let centers = CenterRequirements::from([(1, 2), (2, 2)]);
        let tree = path_tree();
        assert!(tree.violations(&path_graph(), &centers).is_empty());
        assert_eq!(tree.edges(), vec![(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]);
        assert_eq!(tree.degree(1), 2);
        assert_eq!(tree.degrees()[&3], 1);
    }

    #[test]
    fn detects_degree_and_label_violations() {
        let mut tree = path_tree();
        tree.labels.insert(3, 0);
        let centers = CenterRequirements::from([(1, 3)]);
        let violations = tree.violations(&path_graph(), &centers);
        assert!(violations.contains(&TreeViolation::CenterDegree { vertex: 1, required: 3, actual: 2 }));
        assert!(violations.contains(&TreeViolation::LeafDegree { vertex: 2, actual: 2 }));
        assert!(violations.contains(&TreeViolation::LabelOrder { tail: 2, head: 3 }));
    }

    #[test]
    fn detects_forests() {
        let mut tree = path_tree();
        tree.arcs.remove(1);
        let centers = CenterRequirements::from([(1, 1), (2, 1)]);
        let violations = tree.violations(&path_graph(), &centers);
        assert!(violations.contains(&TreeViolation::EdgeCount { expected: 3, actual: 2 }));
        assert!(violations.contains(&TreeViolation::NotSpanning { reached: 2, total: 4 }));
    }

    #[test]
    fn outcome_accessors() {
        let outcome = SolveOutcome::Feasible(path_tree());
        assert_eq!(outcome.status_message(), FEASIBLE_MESSAGE);
        assert_eq!(outcome.elapsed(), Some(Duration::from_millis(5)));
        assert!(!outcome.is_optimal());
        assert_eq!(outcome.into_tree().map(|t| t.objective), Some(3.0));

        let outcome = SolveOutcome::BackendUnavailable { backend: "scip".into() };
        assert_eq!(outcome.elapsed(), None);
        assert!(outcome.tree().is_none());
        assert_eq!(outcome.kind(), "backend_unavailable");
    }
}
