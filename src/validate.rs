//! Upfront checks on a DCMST instance.
//!
//! Everything the MTZ model silently assumes about its input is checked here,
//! so malformed instances fail with an [InputError] instead of surfacing as
//! solver infeasibility.

use crate::config::RootSelection;
use crate::error::InputError;
use crate::graph::{Graph, VertexId};
use crate::model::CenterRequirements;

/// Validates `graph` and `centers` and returns the root vertex to label 0.
pub fn validate_instance(
    graph: &Graph,
    centers: &CenterRequirements,
    root: RootSelection,
) -> Result<VertexId, InputError> {
    let Some(smallest) = graph.vertices().next() else {
        return Err(InputError::EmptyGraph);
    };

    for e in graph.edges() {
        if e.u == e.v {
            return Err(InputError::SelfLoop(e.u));
        }
        if !e.weight().is_finite() {
            return Err(InputError::NonFiniteWeight { u: e.u, v: e.v, weight: e.weight() });
        }
        if e.weight() < 0.0 {
            return Err(InputError::NegativeWeight { u: e.u, v: e.v, weight: e.weight() });
        }
    }

    let reached = graph.reachable_count();
    if reached != graph.num_vertices() {
        return Err(InputError::Disconnected {
            reached,
            total: graph.num_vertices(),
        });
    }

    let max_degree = graph.num_vertices() - 1;
    for (&vertex, &required) in centers {
        if !graph.contains_vertex(vertex) {
            return Err(InputError::UnknownCenter(vertex));
        }
        if required == 0 {
            return Err(InputError::ZeroDegree(vertex));
        }
        if required as usize > max_degree {
            return Err(InputError::DegreeTooLarge { vertex, required, max: max_degree });
        }
    }

    match root {
        RootSelection::Auto => Ok(smallest),
        RootSelection::Vertex(v) if graph.contains_vertex(v) => Ok(v),
        RootSelection::Vertex(v) => Err(InputError::RootNotInGraph(v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> Graph {
        Graph::from_weighted_edges([(1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0)])
    }

    #[test]
    fn auto_root_is_smallest_vertex() {
        let centers = CenterRequirements::from([(2, 2), (3, 2)]);
        assert_eq!(validate_instance(&path(), &centers, RootSelection::Auto), Ok(1));
        assert_eq!(validate_instance(&path(), &centers, RootSelection::Vertex(3)), Ok(3));
    }

    #[test]
    fn explicit_root_must_exist() {
        let err = validate_instance(&path(), &CenterRequirements::new(), RootSelection::Vertex(0));
        assert_eq!(err, Err(InputError::RootNotInGraph(0)));
    }

    #[test]
    fn rejects_bad_graphs() {
        let none = CenterRequirements::new();
        assert_eq!(
            validate_instance(&Graph::new(), &none, RootSelection::Auto),
            Err(InputError::EmptyGraph)
        );

        let mut g = path();
        g.add_edge(4, 4, 1.0);
        assert_eq!(validate_instance(&g, &none, RootSelection::Auto), Err(InputError::SelfLoop(4)));

        let g = Graph::from_weighted_edges([(0, 1, -1.0)]);
        assert!(matches!(
            validate_instance(&g, &none, RootSelection::Auto),
            Err(InputError::NegativeWeight { .. })
        ));

        let g = Graph::from_weighted_edges([(0, 1, f64::INFINITY)]);
        assert!(matches!(
            validate_instance(&g, &none, RootSelection::Auto),
            Err(InputError::NonFiniteWeight { .. })
        ));

        let g = Graph::from_weighted_edges([(0, 1, 1.0), (2, 3, 1.0)]);
        assert_eq!(
            validate_instance(&g, &none, RootSelection::Auto),
            Err(InputError::Disconnected { reached: 2, total: 4 })
        );
    }

    #[test]
    fn rejects_bad_centers() {
        let g = path();
        assert_eq!(
            validate_instance(&g, &CenterRequirements::from([(9, 1)]), RootSelection::Auto),
            Err(InputError::UnknownCenter(9))
        );
        assert_eq!(
            validate_instance(&g, &CenterRequirements::from([(2, 0)]), RootSelection::Auto),
            Err(InputError::ZeroDegree(2))
        );
        assert_eq!(
            validate_instance(&g, &CenterRequirements::from([(2, 4)]), RootSelection::Auto),
            Err(InputError::DegreeTooLarge { vertex: 2, required: 4, max: 3 })
        );
    }
}
