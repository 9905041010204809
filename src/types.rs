use std::collections::BTreeMap;

use crate::error::{GraphError, Result};
use crate::types::graph_query::GraphQuery;

pub mod graph_json;
pub mod graph_query;

/// A weighted edge `from -> to`.
///
/// Weights are signed; negative weights are allowed and are what makes the
/// longest-path computation interesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    /// Tail vertex of the edge
    pub from: usize,
    /// Head vertex of the edge
    pub to: usize,
    /// Signed edge weight
    pub weight: i64,
}

impl Edge {
    pub fn new(from: usize, to: usize, weight: i64) -> Self {
        Self { from, to, weight }
    }
}

/// An adjacency-list graph over the vertices `0..n`.
///
/// The outgoing edges of each vertex are kept in insertion order. Several
/// algorithms use that order to break ties, so it is part of the observable
/// behaviour and is never re-sorted.
///
/// A graph is built once through [`Graph::add_edge`] and then only read by
/// the algorithms, which take `&Graph` and return fresh result values.
///
/// # Example
///
/// let mut graph = Graph::new(3, true);
/// graph.add_edge(0, 1, 4)?;
/// graph.add_edge(1, 2, -1)?;
/// assert_eq!(graph.edges_of(0).len(), 1);
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    /// Whether edges are one-way
    directed: bool,

    /// Outgoing edges of each vertex, in insertion order
    /// `adjacency[u]` holds every edge whose `from` is `u`
    adjacency: Vec<Vec<Edge>>,

    /// Display names, only for vertices that were explicitly named
    vertex_names: BTreeMap<usize, String>,
}

impl Graph {
    /// Creates a graph with `vertex_count` vertices and no edges.
    pub fn new(vertex_count: usize, directed: bool) -> Self {
        Self {
            directed,
            adjacency: vec![Vec::new(); vertex_count],
            vertex_names: BTreeMap::new(),
        }
    }

    /// Builds a graph from `(u, v, w)` triples, inserting them in slice order.
    pub fn from_edges(vertex_count: usize, directed: bool, edges: &[(usize, usize, i64)]) -> Result<Self> {
        let mut graph = Self::new(vertex_count, directed);
        for &(u, v, w) in edges {
            graph.add_edge(u, v, w)?;
        }
        Ok(graph)
    }

    /// Appends the edge `u -> v` with weight `w` to `u`'s adjacency list.
    ///
    /// For an undirected graph the mirror edge `v -> u` is appended to `v`'s
    /// list as well. Self-loops and parallel edges are accepted.
    ///
    /// # Errors
    /// * `InvalidVertex` if either endpoint is not in `[0, n)`; the graph is
    ///   left unchanged in that case.
    pub fn add_edge(&mut self, u: usize, v: usize, w: i64) -> Result<()> {
        self.check_vertex(u)?;
        self.check_vertex(v)?;

        self.adjacency[u].push(Edge::new(u, v, w));
        if !self.directed {
            self.adjacency[v].push(Edge::new(v, u, w));
        }
        Ok(())
    }

    /// Outgoing edges of `u` in insertion order.
    ///
    /// # Panics
    /// * If `u` is out of range. Use [`Graph::try_edges_of`] for a checked lookup.
    pub fn edges_of(&self, u: usize) -> &[Edge] {
        &self.adjacency[u]
    }

    /// Checked variant of [`Graph::edges_of`].
    pub fn try_edges_of(&self, u: usize) -> Result<&[Edge]> {
        self.check_vertex(u)?;
        Ok(&self.adjacency[u])
    }

    /// Number of vertices.
    pub fn size(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of stored edges (an undirected edge counts twice).
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|edges| edges.len()).sum()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Iterates over every stored edge, vertex by vertex, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.adjacency.iter().flatten()
    }

    /// Returns a new graph with every edge flipped.
    ///
    /// Vertex count, weights, directedness and vertex names are preserved.
    /// Edges are re-inserted by scanning `u = 0..n` and each list in order,
    /// so the reversed adjacency lists are ordered by original tail vertex.
    pub fn reversed(&self) -> Graph {
        let mut reversed = Graph {
            directed: self.directed,
            adjacency: vec![Vec::new(); self.size()],
            vertex_names: self.vertex_names.clone(),
        };

        // Undirected graphs already store both directions, so flipping each
        // stored edge once yields the same edge set without duplicates.
        for edge in self.edges() {
            reversed.adjacency[edge.to].push(Edge::new(edge.to, edge.from, edge.weight));
        }

        reversed
    }

    /// Attaches a display name to vertex `id`.
    pub fn set_vertex_name(&mut self, id: usize, name: impl Into<String>) -> Result<()> {
        self.check_vertex(id)?;
        self.vertex_names.insert(id, name.into());
        Ok(())
    }

    /// Display name of vertex `id`, `"V{id}"` when none was set.
    pub fn vertex_name(&self, id: usize) -> String {
        self.vertex_names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("V{}", id))
    }

    /// Returns `InvalidVertex` unless `vertex` is in `[0, n)`.
    pub fn check_vertex(&self, vertex: usize) -> Result<()> {
        if vertex < self.size() {
            Ok(())
        } else {
            Err(GraphError::InvalidVertex {
                vertex,
                vertex_count: self.size(),
            })
        }
    }
}

impl GraphQuery for Graph {
    fn read_neighbor(&self, vertex_id: usize) -> Vec<usize> {
        match self.adjacency.get(vertex_id) {
            Some(edges) => edges.iter().map(|edge| edge.to).collect(),
            None => vec![],
        }
    }

    fn has_vertex(&self, vertex_id: usize) -> bool {
        vertex_id < self.size()
    }

    fn has_edge(&self, src_id: usize, dst_id: usize) -> bool {
        self.edge_weight(src_id, dst_id).is_some()
    }

    fn edge_weight(&self, src_id: usize, dst_id: usize) -> Option<i64> {
        self.adjacency
            .get(src_id)?
            .iter()
            .find(|edge| edge.to == dst_id)
            .map(|edge| edge.weight)
    }

    fn edge_weights(&self, src_id: usize, dst_id: usize) -> Vec<i64> {
        match self.adjacency.get(src_id) {
            Some(edges) => edges
                .iter()
                .filter(|edge| edge.to == dst_id)
                .map(|edge| edge.weight)
                .collect(),
            None => vec![],
        }
    }

    fn vertex_list(&self) -> Vec<usize> {
        (0..self.size()).collect()
    }
}
