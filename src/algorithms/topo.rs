use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, instrument, warn};

use crate::config::{EDGES_PROCESSED, QUEUE_POPS, QUEUE_PUSHES};
use crate::error::{GraphError, Result};
use crate::metrics::Metrics;
use crate::types::Graph;

/// A topological order of a DAG.
#[derive(Debug, Clone)]
pub struct TopoResult {
    /// Permutation of `0..n`; every edge `u -> v` has `u` before `v`
    order: Vec<usize>,

    /// `position[v]` is the index of `v` in `order`
    position: Vec<usize>,

    /// Counters and timing of the sort
    pub metrics: Metrics,
}

impl TopoResult {
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Index of `v` in the order, `None` if `v` is out of range.
    pub fn position_of(&self, v: usize) -> Option<usize> {
        self.position.get(v).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn into_order(self) -> Vec<usize> {
        self.order
    }
}

impl fmt::Display for TopoResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Topo order: {:?}\nTime: {} ns",
            self.order,
            self.metrics.elapsed().as_nanos()
        )
    }
}

/// Orders the vertices of a DAG with Kahn's algorithm.
///
/// # Algorithm
///
/// 1. Count the in-degree of every vertex by scanning all edges.
/// 2. Enqueue every vertex of in-degree zero, in increasing id order.
/// 3. Repeatedly dequeue the front vertex, append it to the order and
///    decrement the in-degree of each edge target, enqueueing a target the
///    moment its in-degree reaches zero.
///
/// The queue is strictly FIFO and the initial scan is by increasing id, so
/// vertices with no constraint between them always come out in the same
/// order for the same edge-insertion order.
///
/// # Errors
/// * `NotADag` when fewer than `n` vertices could be ordered, i.e. the graph
///   has a cycle. No partial order is returned.
#[instrument(skip_all, fields(vertices = dag.size(), edges = dag.edge_count()))]
pub fn topological_sort(dag: &Graph) -> Result<TopoResult> {
    let mut metrics = Metrics::new();
    metrics.start_timer();

    let n = dag.size();
    let mut in_degree = vec![0usize; n];
    for edge in dag.edges() {
        in_degree[edge.to] += 1;
    }

    let mut queue: VecDeque<usize> = VecDeque::with_capacity(n);
    for v in 0..n {
        if in_degree[v] == 0 {
            queue.push_back(v);
            metrics.increment(QUEUE_PUSHES);
        }
    }

    let mut order = Vec::with_capacity(n);
    while let Some(u) = queue.pop_front() {
        metrics.increment(QUEUE_POPS);
        order.push(u);

        for edge in dag.edges_of(u) {
            metrics.increment(EDGES_PROCESSED);
            in_degree[edge.to] -= 1;
            if in_degree[edge.to] == 0 {
                queue.push_back(edge.to);
                metrics.increment(QUEUE_PUSHES);
            }
        }
    }

    metrics.stop_timer();

    if order.len() != n {
        warn!(ordered = order.len(), vertices = n, "cycle detected during topological sort");
        return Err(GraphError::NotADag {
            ordered: order.len(),
            vertex_count: n,
        });
    }

    let mut position = vec![0usize; n];
    for (index, &v) in order.iter().enumerate() {
        position[v] = index;
    }

    debug!(elapsed_us = metrics.elapsed().as_micros() as u64, "topological sort finished");

    Ok(TopoResult {
        order,
        position,
        metrics,
    })
}

#[cfg(test)]
mod test_topo {
    use super::*;

    #[test]
    fn test_simple_dag() {
        let graph = Graph::from_edges(
            6,
            true,
            &[(5, 2, 1), (5, 0, 1), (4, 0, 1), (4, 1, 1), (2, 3, 1), (3, 1, 1)],
        )
        .unwrap();
        let topo = topological_sort(&graph).unwrap();

        // Initial queue [4, 5]; FIFO gives this exact order.
        assert_eq!(topo.order(), &[4, 5, 2, 0, 3, 1]);
        assert!(topo.position_of(5) < topo.position_of(2));
        assert!(topo.position_of(2) < topo.position_of(3));
        assert!(topo.position_of(3) < topo.position_of(1));

        assert_eq!(topo.metrics.counter(EDGES_PROCESSED), 6);
        assert_eq!(topo.metrics.counter(QUEUE_PUSHES), 6);
        assert_eq!(topo.metrics.counter(QUEUE_POPS), 6);
    }

    #[test]
    fn test_isolated_vertices_keep_id_order() {
        let topo = topological_sort(&Graph::new(3, true)).unwrap();
        assert_eq!(topo.order(), &[0, 1, 2]);
    }

    #[test]
    fn test_single_vertex() {
        let topo = topological_sort(&Graph::new(1, true)).unwrap();
        assert_eq!(topo.order(), &[0]);
        assert_eq!(topo.position_of(0), Some(0));
        assert_eq!(topo.position_of(1), None);
    }

    #[test]
    fn test_fifo_tie_break() {
        // 0 -> 3, 0 -> 2, 1 -> 2: queue starts [0, 1], 3 is released before 2.
        let graph = Graph::from_edges(4, true, &[(0, 3, 1), (0, 2, 1), (1, 2, 1)]).unwrap();
        assert_eq!(topological_sort(&graph).unwrap().order(), &[0, 1, 3, 2]);
    }

    #[test]
    fn test_cycle_is_reported() {
        let graph = Graph::from_edges(3, true, &[(0, 1, 1), (1, 2, 1), (2, 0, 1)]).unwrap();

        match topological_sort(&graph) {
            Err(GraphError::NotADag { ordered, vertex_count }) => {
                assert_eq!(ordered, 0);
                assert_eq!(vertex_count, 3);
            }
            other => panic!("expected NotADag, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_cycle_is_reported() {
        // 0 -> 1 <-> 2: vertex 0 can be ordered, the rest cannot.
        let graph = Graph::from_edges(3, true, &[(0, 1, 1), (1, 2, 1), (2, 1, 1)]).unwrap();
        assert!(matches!(
            topological_sort(&graph),
            Err(GraphError::NotADag { ordered: 1, vertex_count: 3 })
        ));
    }

    #[test]
    fn test_parallel_edges() {
        let graph = Graph::from_edges(2, true, &[(0, 1, 1), (0, 1, 2)]).unwrap();
        assert_eq!(topological_sort(&graph).unwrap().order(), &[0, 1]);
    }
}
