use std::collections::VecDeque;

use proptest::prelude::*;

use sccdag::algorithms::condensation::{build_condensation, CondensationWeight};
use sccdag::algorithms::path::{longest_paths, shortest_paths, PathKind, PathResult};
use sccdag::algorithms::scc::SCC;
use sccdag::algorithms::topo::topological_sort;
use sccdag::types::graph_query::GraphQuery;
use sccdag::util::path_weight;
use sccdag::Graph;

fn arb_graph() -> impl Strategy<Value = Graph> {
    (1usize..24).prop_flat_map(|n| {
        prop::collection::vec((0..n, 0..n, -20i64..20), 0..n * 3).prop_map(move |edges| {
            Graph::from_edges(n, true, &edges).unwrap()
        })
    })
}

/// Random DAG: every edge goes from a lower to a higher id.
fn arb_dag() -> impl Strategy<Value = Graph> {
    (2usize..24).prop_flat_map(|n| {
        prop::collection::vec((0..n, 0..n, -20i64..20), 0..n * 3).prop_map(move |edges| {
            let edges: Vec<_> = edges
                .into_iter()
                .filter(|(u, v, _)| u != v)
                .map(|(u, v, w)| (u.min(v), u.max(v), w))
                .collect();
            Graph::from_edges(n, true, &edges).unwrap()
        })
    })
}

fn reachable_from(graph: &Graph, start: usize) -> Vec<bool> {
    let mut seen = vec![false; graph.size()];
    let mut queue = VecDeque::from([start]);
    seen[start] = true;
    while let Some(u) = queue.pop_front() {
        for edge in graph.edges_of(u) {
            if !seen[edge.to] {
                seen[edge.to] = true;
                queue.push_back(edge.to);
            }
        }
    }
    seen
}

fn check_paths(dag: &Graph, result: &PathResult) -> Result<(), TestCaseError> {
    let kind = result.kind();
    let source = result.source();
    let reachable = reachable_from(dag, source);

    for v in 0..dag.size() {
        prop_assert_eq!(result.is_reachable(v), reachable[v]);
        match result.path_to(v) {
            None => {
                prop_assert!(!reachable[v]);
                prop_assert_eq!(result.dist()[v], kind.sentinel());
                prop_assert_eq!(result.distance_to(v), None);
            }
            Some(path) => {
                prop_assert_eq!(path[0], source);
                prop_assert_eq!(*path.last().unwrap(), v);
                for hop in path.windows(2) {
                    prop_assert!(dag.has_edge(hop[0], hop[1]), "missing edge {} -> {}", hop[0], hop[1]);
                }
                prop_assert_eq!(path_weight(dag, &path, kind), result.distance_to(v));
            }
        }
    }

    // No edge out of a reachable vertex can still improve a distance.
    for edge in dag.edges() {
        if let (Some(du), Some(dv)) = (result.distance_to(edge.from), result.distance_to(edge.to)) {
            match kind {
                PathKind::Shortest => prop_assert!(dv <= du + edge.weight),
                PathKind::Longest => prop_assert!(dv >= du + edge.weight),
            }
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_scc_partitions_vertices(graph in arb_graph()) {
        let scc = graph.scc();
        let n = graph.size();

        let mut seen = vec![0usize; n];
        for (id, component) in scc.components().iter().enumerate() {
            prop_assert!(!component.is_empty());
            for &v in component {
                seen[v] += 1;
                prop_assert_eq!(scc.component_of()[v], id);
            }
        }
        prop_assert!(seen.iter().all(|&count| count == 1));
        prop_assert_eq!(scc.sizes().iter().sum::<usize>(), n);
    }

    #[test]
    fn prop_scc_is_mutual_reachability(graph in arb_graph()) {
        let scc = graph.scc();
        let reach: Vec<Vec<bool>> = (0..graph.size()).map(|v| reachable_from(&graph, v)).collect();

        for u in 0..graph.size() {
            for v in 0..graph.size() {
                let same = scc.component_of()[u] == scc.component_of()[v];
                prop_assert_eq!(same, reach[u][v] && reach[v][u]);
            }
        }
    }

    #[test]
    fn prop_condensation_is_acyclic(graph in arb_graph()) {
        let scc = graph.scc();
        let condensation = build_condensation(&graph, &scc, CondensationWeight::First).unwrap();
        let dag = &condensation.dag;

        prop_assert_eq!(dag.size(), scc.len());
        for edge in dag.edges() {
            prop_assert_ne!(edge.from, edge.to);
            prop_assert!(edge.from < edge.to);
        }
        prop_assert!(topological_sort(dag).is_ok());
    }

    #[test]
    fn prop_condensation_has_one_edge_per_pair(graph in arb_graph()) {
        let scc = graph.scc();
        let condensation = build_condensation(&graph, &scc, CondensationWeight::Min).unwrap();

        let mut pairs: Vec<(usize, usize)> = condensation.dag.edges().map(|e| (e.from, e.to)).collect();
        let total = pairs.len();
        pairs.sort_unstable();
        pairs.dedup();
        prop_assert_eq!(pairs.len(), total);
    }

    #[test]
    fn prop_topo_order_respects_edges(dag in arb_dag()) {
        let topo = topological_sort(&dag).unwrap();
        prop_assert_eq!(topo.len(), dag.size());

        let mut sorted = topo.order().to_vec();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, (0..dag.size()).collect::<Vec<_>>());

        for edge in dag.edges() {
            prop_assert!(topo.position_of(edge.from) < topo.position_of(edge.to));
        }
    }

    #[test]
    fn prop_shortest_paths_are_consistent(dag in arb_dag(), pick in any::<prop::sample::Index>()) {
        let source = pick.index(dag.size());
        let result = shortest_paths(&dag, source).unwrap();
        check_paths(&dag, &result)?;
    }

    #[test]
    fn prop_longest_paths_are_consistent(dag in arb_dag(), pick in any::<prop::sample::Index>()) {
        let source = pick.index(dag.size());
        let result = longest_paths(&dag, source).unwrap();
        check_paths(&dag, &result)?;
    }
}
