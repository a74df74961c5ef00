//! Directed graphs obtained by doubling every undirected edge.

use super::{EdgeData, Graph, VertexId};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Directed arc `tail -> head`.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub tail: VertexId,
    pub head: VertexId,
    pub data: EdgeData,
}

impl Arc {
    pub fn weight(&self) -> f64 {
        self.data.weight
    }
}

/// Directed graph with arc indices and in/out adjacency.
///
/// Arcs are stored in insertion order; [ArcIndex] values stay valid for the
/// lifetime of the graph and are used by the model builder to line up one
/// decision variable per arc.
#[derive(Debug, Clone, Default)]
pub struct DirectedGraph {
    vertices: BTreeSet<VertexId>,
    arcs: Vec<Arc>,
    index: HashMap<(VertexId, VertexId), ArcIndex>,
    out_arcs: BTreeMap<VertexId, Vec<ArcIndex>>,
    in_arcs: BTreeMap<VertexId, Vec<ArcIndex>>,
}

/// Index of an arc in a [DirectedGraph].
pub type ArcIndex = usize;

impl DirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, vertex: VertexId) {
        self.vertices.insert(vertex);
    }

    /// Adds arc `tail -> head`, replacing the data of an existing identical arc.
    pub fn add_arc(&mut self, tail: VertexId, head: VertexId, data: EdgeData) -> ArcIndex {
        self.vertices.insert(tail);
        self.vertices.insert(head);
        if let Some(&i) = self.index.get(&(tail, head)) {
            self.arcs[i].data = data;
            return i;
        }

        let i = self.arcs.len();
        self.arcs.push(Arc { tail, head, data });
        self.index.insert((tail, head), i);
        self.out_arcs.entry(tail).or_default().push(i);
        self.in_arcs.entry(head).or_default().push(i);
        i
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.iter().copied()
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn arc(&self, index: ArcIndex) -> &Arc {
        &self.arcs[index]
    }

    pub fn find_arc(&self, tail: VertexId, head: VertexId) -> Option<ArcIndex> {
        self.index.get(&(tail, head)).copied()
    }

    /// Indices of arcs leaving `vertex`.
    pub fn out_arcs(&self, vertex: VertexId) -> &[ArcIndex] {
        self.out_arcs.get(&vertex).map(Vec::as_slice).unwrap_or_default()
    }

    /// Indices of arcs entering `vertex`.
    pub fn in_arcs(&self, vertex: VertexId) -> &[ArcIndex] {
        self.in_arcs.get(&vertex).map(Vec::as_slice).unwrap_or_default()
    }

}

/// Replaces every undirected edge `{u, v}` of `graph` by the arcs `u -> v`
/// and `v -> u`, each holding its own copy of the edge data.
///
/// All vertices of `graph` are kept, including isolated ones. A self-loop
/// yields the single arc `u -> u`.
pub fn transform_to_directed(graph: &Graph) -> DirectedGraph {
    let mut directed = DirectedGraph::new();
    for vertex in graph.vertices() {
        directed.add_vertex(vertex);
    }
    for edge in graph.edges() {
        directed.add_arc(edge.u, edge.v, edge.data.clone());
        directed.add_arc(edge.v, edge.u, edge.data.clone());
    }
    directed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Graph {
        Graph::from_weighted_edges([(0, 1, 4.0), (1, 2, 2.5), (0, 2, 1.0)])
    }

    #[test]
    fn every_edge_becomes_two_opposite_arcs() {
        let g = sample();
        let d = transform_to_directed(&g);
        assert_eq!(d.num_arcs(), 2 * g.num_edges());
        assert_eq!(d.num_vertices(), g.num_vertices());
        for e in g.edges() {
            let forward = d.find_arc(e.u, e.v).unwrap();
            let backward = d.find_arc(e.v, e.u).unwrap();
            assert_ne!(forward, backward);
            assert_eq!(d.arc(forward).weight(), e.weight());
            assert_eq!(d.arc(backward).weight(), e.weight());
        }
    }

    #[test]
    fn no_arcs_beyond_the_doubled_edges() {
        let d = transform_to_directed(&sample());
        for a in d.arcs() {
            assert!(sample().edge(a.tail, a.head).is_some());
        }
    }

    #[test]
    fn adjacency_lists() {
        let d = transform_to_directed(&sample());
        let mut succ: Vec<_> = d.out_arcs(0).iter().map(|&i| d.arc(i).head).collect();
        succ.sort();
        assert_eq!(succ, vec![1, 2]);
        let mut pred: Vec<_> = d.in_arcs(2).iter().map(|&i| d.arc(i).tail).collect();
        pred.sort();
        assert_eq!(pred, vec![0, 1]);
        assert!(d.out_arcs(42).is_empty());
    }

    #[test]
    fn arc_data_is_copied_not_shared() {
        let mut g = Graph::new();
        g.add_edge_with_data(0, 1, EdgeData::new(3.0).with_attribute("color", json!("red")));
        let mut d = transform_to_directed(&g);

        let forward = d.find_arc(0, 1).unwrap();
        d.arcs[forward].data.weight = 10.0;
        d.arcs[forward].data.attributes.insert("color".into(), json!("blue"));

        let backward = d.arc(d.find_arc(1, 0).unwrap());
        assert_eq!(backward.weight(), 3.0);
        assert_eq!(backward.data.attributes["color"], json!("red"));
        assert_eq!(g.weight(0, 1), Some(3.0));
    }

    #[test]
    fn self_loop_collapses_to_one_arc() {
        let mut g = Graph::new();
        g.add_edge(5, 5, 1.0);
        let d = transform_to_directed(&g);
        assert_eq!(d.num_arcs(), 1);
        assert_eq!(d.out_arcs(5), d.in_arcs(5));
    }

    #[test]
    fn isolated_vertices_survive() {
        let mut g = sample();
        g.add_vertex(7);
        let d = transform_to_directed(&g);
        assert_eq!(d.num_vertices(), 4);
        assert!(d.in_arcs(7).is_empty());
    }
}
