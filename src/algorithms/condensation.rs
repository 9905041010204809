use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::algorithms::scc::SCCResult;
use crate::config::{CONDENSED_EDGES, DROPPED_INTRA_EDGES, EDGES_PROCESSED, MERGED_PARALLEL_EDGES};
use crate::error::{GraphError, Result};
use crate::metrics::Metrics;
use crate::types::Graph;

/// How the weight of a condensation edge is chosen when several original
/// edges connect the same ordered pair of components.
///
/// The condensation edge is always emitted once, at the position where the
/// pair was first seen; only its weight depends on the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CondensationWeight {
    /// Keep the weight of the first edge seen, drop the rest
    #[default]
    First,
    /// Smallest weight among the parallel edges
    Min,
    /// Largest weight among the parallel edges
    Max,
    /// Sum of the parallel edge weights, saturating at the `i64` bounds
    Sum,
}

impl CondensationWeight {
    fn merge(self, current: i64, incoming: i64) -> i64 {
        match self {
            CondensationWeight::First => current,
            CondensationWeight::Min => current.min(incoming),
            CondensationWeight::Max => current.max(incoming),
            CondensationWeight::Sum => current.saturating_add(incoming),
        }
    }
}

impl FromStr for CondensationWeight {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "first" => Ok(CondensationWeight::First),
            "min" => Ok(CondensationWeight::Min),
            "max" => Ok(CondensationWeight::Max),
            "sum" => Ok(CondensationWeight::Sum),
            other => Err(format!(
                "unknown condensation weight policy '{}', expected one of: first, min, max, sum",
                other
            )),
        }
    }
}

impl fmt::Display for CondensationWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CondensationWeight::First => "first",
            CondensationWeight::Min => "min",
            CondensationWeight::Max => "max",
            CondensationWeight::Sum => "sum",
        };
        f.write_str(name)
    }
}

/// The condensation DAG of a graph plus the metrics of building it.
#[derive(Debug, Clone)]
pub struct Condensation {
    /// One vertex per component; vertex `c` is component `c`
    pub dag: Graph,
    /// Counters and timing of the build
    pub metrics: Metrics,
}

/// Collapses every strongly connected component into a single vertex.
///
/// Original edges are scanned vertex by vertex (`0..n`) and, per vertex, in
/// insertion order. An edge `u -> v` with `component_of[u] != component_of[v]`
/// produces the condensation edge `component_of[u] -> component_of[v]` the
/// first time that ordered pair is seen; later edges between the same pair
/// only feed the `weight` policy. Edges inside a component are dropped.
///
/// The result is acyclic because components are maximal sets of mutually
/// reachable vertices.
///
/// # Errors
/// * `SccSizeMismatch` if `scc` was computed for a graph of a different size.
#[instrument(skip_all, fields(vertices = graph.size(), components = scc.len(), weight = %weight))]
pub fn build_condensation(graph: &Graph, scc: &SCCResult, weight: CondensationWeight) -> Result<Condensation> {
    let component_of = scc.component_of();
    if component_of.len() != graph.size() {
        return Err(GraphError::SccSizeMismatch {
            scc_vertices: component_of.len(),
            graph_vertices: graph.size(),
        });
    }

    let mut metrics = Metrics::new();
    metrics.start_timer();

    // First-seen order of component pairs, with their merged weights
    let mut condensed: Vec<(usize, usize, i64)> = Vec::new();
    let mut seen: FxHashMap<(usize, usize), usize> = FxHashMap::default();

    for edge in graph.edges() {
        metrics.increment(EDGES_PROCESSED);

        let from = component_of[edge.from];
        let to = component_of[edge.to];
        if from == to {
            metrics.increment(DROPPED_INTRA_EDGES);
            continue;
        }

        match seen.get(&(from, to)) {
            Some(&slot) => {
                let entry = &mut condensed[slot];
                entry.2 = weight.merge(entry.2, edge.weight);
                metrics.increment(MERGED_PARALLEL_EDGES);
            }
            None => {
                seen.insert((from, to), condensed.len());
                condensed.push((from, to, edge.weight));
            }
        }
    }

    let mut dag = Graph::new(scc.len(), true);
    for (from, to, w) in condensed {
        dag.add_edge(from, to, w)?;
        metrics.increment(CONDENSED_EDGES);
    }

    metrics.stop_timer();
    let merged = metrics.counter(MERGED_PARALLEL_EDGES);
    if merged > 0 {
        warn!(merged, policy = %weight, "parallel inter-component edges merged");
    }
    debug!(
        condensed_edges = dag.edge_count(),
        elapsed_us = metrics.elapsed().as_micros() as u64,
        "condensation built"
    );

    Ok(Condensation { dag, metrics })
}

#[cfg(test)]
mod test_condensation {
    use super::*;
    use crate::algorithms::scc::SCC;
    use crate::algorithms::topo::topological_sort;
    use crate::types::Edge;

    fn condense(graph: &Graph, weight: CondensationWeight) -> Condensation {
        build_condensation(graph, &graph.scc(), weight).unwrap()
    }

    #[test]
    fn test_condensation_simple() {
        // SCC {0,1} and SCC {2,3} joined by 1 -> 2
        let graph = Graph::from_edges(
            4,
            true,
            &[(0, 1, 1), (1, 0, 1), (2, 3, 1), (1, 2, 5), (3, 2, 1)],
        )
        .unwrap();
        let condensation = condense(&graph, CondensationWeight::First);

        assert_eq!(condensation.dag.size(), 2);
        assert_eq!(condensation.dag.edge_count(), 1);
        assert_eq!(condensation.dag.edges_of(0), &[Edge::new(0, 1, 5)]);
        assert_eq!(condensation.metrics.counter(DROPPED_INTRA_EDGES), 4);
        assert_eq!(condensation.metrics.counter(EDGES_PROCESSED), 5);
    }

    #[test]
    fn test_single_component_has_no_edges() {
        let graph = Graph::from_edges(3, true, &[(0, 1, 1), (1, 2, 1), (2, 0, 1)]).unwrap();
        let condensation = condense(&graph, CondensationWeight::First);

        assert_eq!(condensation.dag.size(), 1);
        assert_eq!(condensation.dag.edge_count(), 0);
    }

    #[test]
    fn test_parallel_edges_follow_policy() {
        // {0,1} -> {2} three times with weights 4, 1, 7
        let graph = Graph::from_edges(
            3,
            true,
            &[(0, 1, 1), (1, 0, 1), (0, 2, 4), (1, 2, 1), (0, 2, 7)],
        )
        .unwrap();

        let expect = |policy, w| {
            let condensation = condense(&graph, policy);
            assert_eq!(condensation.dag.edges_of(0), &[Edge::new(0, 1, w)], "{}", policy);
            assert_eq!(condensation.metrics.counter(MERGED_PARALLEL_EDGES), 2);
        };

        expect(CondensationWeight::First, 4);
        expect(CondensationWeight::Min, 1);
        expect(CondensationWeight::Max, 7);
        expect(CondensationWeight::Sum, 12);
    }

    #[test]
    fn test_condensation_of_cyclic_graph_is_acyclic() {
        let graph = Graph::from_edges(
            8,
            true,
            &[
                (0, 1, 3), (1, 2, 2), (2, 3, 4), (3, 1, 1),
                (4, 5, 2), (5, 6, 5), (6, 7, 1), (7, 4, 1), (3, 4, 2),
            ],
        )
        .unwrap();
        let condensation = condense(&graph, CondensationWeight::First);

        assert!(topological_sort(&condensation.dag).is_ok());
        for edge in condensation.dag.edges() {
            assert!(edge.from < edge.to);
        }
    }

    #[test]
    fn test_mismatched_scc_is_rejected() {
        let small = Graph::from_edges(2, true, &[(0, 1, 1)]).unwrap();
        let large = Graph::new(3, true);
        let scc = small.scc();

        let err = build_condensation(&large, &scc, CondensationWeight::First).unwrap_err();
        assert!(matches!(
            err,
            GraphError::SccSizeMismatch { scc_vertices: 2, graph_vertices: 3 }
        ));
        assert_eq!(err.to_string(), "SCC result covers 2 vertices but the graph has 3");
    }

    #[test]
    fn test_weight_policy_parsing() {
        assert_eq!("MIN".parse::<CondensationWeight>(), Ok(CondensationWeight::Min));
        assert_eq!("first".parse::<CondensationWeight>(), Ok(CondensationWeight::First));
        assert!("avg".parse::<CondensationWeight>().is_err());
        assert_eq!(CondensationWeight::Sum.to_string(), "sum");
    }
}
