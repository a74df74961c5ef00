//! JSON instance files.
//!
//! ```json
//! {
//!   "vertices": [0, 1, 2],
//!   "edges": [ { "u": 0, "v": 1, "weight": 2.0, "label": "a" },
//!              { "u": 0, "v": 2, "weight": 1.5 } ],
//!   "centers": { "0": 2 }
//! }
//! ```
//!
//! `vertices` is optional; endpoints of edges are always vertices. Extra edge
//! fields are kept as edge attributes.

use crate::error::Result;
use crate::graph::{Edge, Graph, VertexId};
use crate::model::CenterRequirements;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Instance {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vertices: Vec<VertexId>,
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub centers: CenterRequirements,
}

impl Instance {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn graph(&self) -> Graph {
        let mut graph = Graph::new();
        for &v in &self.vertices {
            graph.add_vertex(v);
        }
        for e in &self.edges {
            graph.add_edge_with_data(e.u, e.v, e.data.clone());
        }
        graph
    }

    pub fn from_graph(graph: &Graph, centers: CenterRequirements) -> Self {
        Self {
            vertices: graph.vertices().collect(),
            edges: graph.edges().to_vec(),
            centers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STAR: &str = r#"{
        "edges": [
            { "u": 0, "v": 1, "weight": 1 },
            { "u": 0, "v": 2, "weight": 1, "road": "A1" },
            { "u": 0, "v": 3, "weight": 1 }
        ],
        "centers": { "0": 3 }
    }"#;

    #[test]
    fn parses_edges_centers_and_attributes() {
        let instance = Instance::from_json_str(STAR).unwrap();
        assert_eq!(instance.centers, CenterRequirements::from([(0, 3)]));
        let graph = instance.graph();
        assert_eq!(graph.num_vertices(), 4);
        assert_eq!(graph.edge(2, 0).unwrap().data.attributes["road"], json!("A1"));
    }

    #[test]
    fn explicit_vertices_may_be_isolated() {
        let instance = Instance::from_json_str(r#"{ "vertices": [7], "edges": [] }"#).unwrap();
        assert!(instance.centers.is_empty());
        assert_eq!(instance.graph().num_vertices(), 1);
    }

    #[test]
    fn survives_a_json_trip() {
        let instance = Instance::from_json_str(STAR).unwrap();
        let again = Instance::from_json_str(&instance.to_json_string().unwrap()).unwrap();
        assert_eq!(again.edges, instance.edges);
        assert_eq!(again.centers, instance.centers);
    }
}
