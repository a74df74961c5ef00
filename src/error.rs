//! Error types for instance validation, model construction and solving.
//!
//! Solver outcomes (infeasible, time limit without incumbent, no backend) are
//! not errors; they are reported through [`crate::solution::SolveOutcome`].

use crate::graph::VertexId;
use thiserror::Error;

/// Result type alias for DCMST operations.
pub type Result<T> = std::result::Result<T, DcmstError>;

/// Top-level error type of the crate.
#[derive(Error, Debug)]
pub enum DcmstError {
    /// The graph or the center requirements were rejected before any model was built.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The solver backend refused part of the model.
    #[error("{backend} backend error: {message}")]
    Backend { backend: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DcmstError {
    pub fn backend(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Whether this error was raised by upfront input validation.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Reasons an instance is rejected by [`crate::validate::validate_instance`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("graph has no vertices")]
    EmptyGraph,

    #[error("self-loop on vertex {0}")]
    SelfLoop(VertexId),

    #[error("edge {{{u}, {v}}} has non-finite weight {weight}")]
    NonFiniteWeight { u: VertexId, v: VertexId, weight: f64 },

    #[error("edge {{{u}, {v}}} has negative weight {weight}")]
    NegativeWeight { u: VertexId, v: VertexId, weight: f64 },

    /// Only `reached` of `total` vertices are reachable from the first vertex.
    #[error("graph is disconnected: {reached} of {total} vertices reachable")]
    Disconnected { reached: usize, total: usize },

    #[error("center {0} is not a vertex of the graph")]
    UnknownCenter(VertexId),

    #[error("center {0} has a zero degree requirement")]
    ZeroDegree(VertexId),

    #[error("center {vertex} requires degree {required}, but at most {max} is possible")]
    DegreeTooLarge {
        vertex: VertexId,
        required: u32,
        max: usize,
    },

    #[error("root vertex {0} is not a vertex of the graph")]
    RootNotInGraph(VertexId),
}
