/// Read-only queries over a graph.
///
/// The algorithms themselves walk adjacency lists directly through
/// [`crate::types::Graph::edges_of`]; this trait is the narrower view used by
/// callers that only need to ask questions about the structure, such as
/// validating a reconstructed path.
pub trait GraphQuery {
    /// Retrieves the heads of all outgoing edges of a vertex, in insertion order.
    ///
    /// Returns an empty vector for an unknown vertex.
    fn read_neighbor(&self, vertex_id: usize) -> Vec<usize>;

    /// Checks if a specific vertex exists in the graph.
    fn has_vertex(&self, vertex_id: usize) -> bool;

    /// Determines if an edge exists from `src_id` to `dst_id`.
    fn has_edge(&self, src_id: usize, dst_id: usize) -> bool;

    /// Weight of the first edge from `src_id` to `dst_id`, if there is one.
    fn edge_weight(&self, src_id: usize, dst_id: usize) -> Option<i64>;

    /// Weights of every parallel edge from `src_id` to `dst_id`, in insertion order.
    fn edge_weights(&self, src_id: usize, dst_id: usize) -> Vec<i64>;

    /// Retrieves a list of all vertices in the graph.
    fn vertex_list(&self) -> Vec<usize>;
}
