//! Undirected weighted graphs.
//!
//! Provides [Graph], the input of the DCMST model, and its directed
//! counterpart in [directed]. Edges carry an [EdgeData] with a numeric weight
//! and arbitrary extra attributes which are preserved through
//! directionalization.

pub mod directed;

pub use directed::{Arc, DirectedGraph, transform_to_directed};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

/// Identifier of a vertex.
pub type VertexId = u32;

/// Data attached to an edge (and copied to both arcs of the edge).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeData {
    pub weight: f64,
    /// Opaque attributes, carried along but never interpreted.
    #[serde(default, flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl EdgeData {
    pub fn new(weight: f64) -> Self {
        Self {
            weight,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// Undirected edge `{u, v}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub u: VertexId,
    pub v: VertexId,
    #[serde(flatten)]
    pub data: EdgeData,
}

impl Edge {
    pub fn weight(&self) -> f64 {
        self.data.weight
    }

    /// Returns the other endpoint, if `vertex` is an endpoint at all.
    pub fn other(&self, vertex: VertexId) -> Option<VertexId> {
        if self.u == vertex {
            Some(self.v)
        } else if self.v == vertex {
            Some(self.u)
        } else {
            None
        }
    }
}

/// Normalized key of an undirected edge.
fn edge_key(u: VertexId, v: VertexId) -> (VertexId, VertexId) {
    if u <= v { (u, v) } else { (v, u) }
}

/// Undirected, edge-weighted simple graph.
///
/// Adding an edge that already exists (in either orientation) replaces its
/// data, so there is at most one edge per vertex pair.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: BTreeSet<VertexId>,
    edges: Vec<Edge>,
    index: HashMap<(VertexId, VertexId), usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from `(u, v, weight)` triples.
    pub fn from_weighted_edges<I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (VertexId, VertexId, f64)>,
    {
        let mut graph = Self::new();
        for (u, v, weight) in edges {
            graph.add_edge(u, v, weight);
        }
        graph
    }

    pub fn add_vertex(&mut self, vertex: VertexId) {
        self.vertices.insert(vertex);
    }

    pub fn add_edge(&mut self, u: VertexId, v: VertexId, weight: f64) {
        self.add_edge_with_data(u, v, EdgeData::new(weight));
    }

    pub fn add_edge_with_data(&mut self, u: VertexId, v: VertexId, data: EdgeData) {
        self.vertices.insert(u);
        self.vertices.insert(v);
        match self.index.get(&edge_key(u, v)) {
            Some(&i) => self.edges[i].data = data,
            None => {
                self.index.insert(edge_key(u, v), self.edges.len());
                self.edges.push(Edge { u, v, data });
            }
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.iter().copied()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.vertices.contains(&vertex)
    }

    pub fn edge(&self, u: VertexId, v: VertexId) -> Option<&Edge> {
        self.index.get(&edge_key(u, v)).map(|&i| &self.edges[i])
    }

    pub fn weight(&self, u: VertexId, v: VertexId) -> Option<f64> {
        self.edge(u, v).map(Edge::weight)
    }

    pub fn neighbors(&self, vertex: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.edges.iter().filter_map(move |e| e.other(vertex))
    }

    pub fn degree(&self, vertex: VertexId) -> usize {
        self.neighbors(vertex).count()
    }

    /// Number of vertices reachable from the smallest vertex (BFS).
    pub fn reachable_count(&self) -> usize {
        let Some(&start) = self.vertices.iter().next() else {
            return 0;
        };
        let mut adjacency: HashMap<VertexId, Vec<VertexId>> = HashMap::new();
        for e in &self.edges {
            adjacency.entry(e.u).or_default().push(e.v);
            adjacency.entry(e.v).or_default().push(e.u);
        }

        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(vertex) = queue.pop_front() {
            for &next in adjacency.get(&vertex).map(Vec::as_slice).unwrap_or_default() {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen.len()
    }

    pub fn is_connected(&self) -> bool {
        self.reachable_count() == self.num_vertices()
    }
}
