//! Degree-constrained minimum spanning trees as a mixed-integer program.
//!
//! Given an undirected weighted [Graph] and minimum degrees for some "center"
//! vertices, finds a minimum-weight spanning tree in which every center
//! reaches its degree and every other vertex is a leaf. Cycles are excluded
//! with Miller–Tucker–Zemlin vertex labels instead of subtour constraints.
//!
//! ```no_run
//! use dcmst_mtz::{CenterRequirements, Graph, SolverConfig, solve_with_mtz};
//!
//! let graph = Graph::from_weighted_edges([(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0), (0, 4, 1.0)]);
//! let centers = CenterRequirements::from([(0, 4)]);
//! let outcome = solve_with_mtz(&graph, &centers, &SolverConfig::default())?;
//! println!("{}", outcome.status_message());
//! # Ok::<(), dcmst_mtz::DcmstError>(())
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod graph;
pub mod instance;
pub mod model;
pub mod solution;
pub mod validate;

pub use backend::{BackendStatus, MilpBackend, create_backend};
pub use config::{DegreeRule, RootSelection, SolverConfig};
pub use error::{DcmstError, InputError, Result};
pub use graph::{DirectedGraph, EdgeData, Graph, VertexId, transform_to_directed};
pub use model::{CenterRequirements, solve_with_backend, solve_with_mtz};
pub use solution::{SolveOutcome, TreeSolution};
