use crate::algorithms::path::PathKind;
use crate::types::graph_query::GraphQuery;
use crate::types::Graph;

/// Joins a vertex path with arrows, e.g. `0 -> 2 -> 5`.
pub fn format_path(path: &[usize]) -> String {
    path.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Like [`format_path`] but prints vertex names from `graph`.
pub fn format_named_path(graph: &Graph, path: &[usize]) -> String {
    path.iter()
        .map(|&v| graph.vertex_name(v))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Renders a distance, using `unreachable` for `None`.
pub fn format_distance(distance: Option<i64>) -> String {
    match distance {
        Some(d) => d.to_string(),
        None => String::from("unreachable"),
    }
}

/// Sum of the edge weights along `path` as a `kind` run would price it.
///
/// A hop with parallel edges costs the lightest of them for shortest paths
/// and the heaviest for longest paths, the edge relaxation settled on.
/// `None` if a hop has no edge in `graph` or the sum overflows.
pub fn path_weight<G: GraphQuery>(graph: &G, path: &[usize], kind: PathKind) -> Option<i64> {
    path.windows(2).try_fold(0i64, |total, hop| {
        let weights = graph.edge_weights(hop[0], hop[1]).into_iter();
        let best = match kind {
            PathKind::Shortest => weights.min(),
            PathKind::Longest => weights.max(),
        }?;
        total.checked_add(best)
    })
}

#[cfg(test)]
mod test_util {
    use super::*;
    use crate::algorithms::path::{longest_paths, shortest_paths};

    #[test]
    fn test_format_path() {
        assert_eq!(format_path(&[0, 2, 5]), "0 -> 2 -> 5");
        assert_eq!(format_path(&[3]), "3");
        assert_eq!(format_path(&[]), "");
    }

    #[test]
    fn test_format_named_path() {
        let mut graph = Graph::new(3, true);
        graph.set_vertex_name(1, "hub").unwrap();
        assert_eq!(format_named_path(&graph, &[0, 1, 2]), "V0 -> hub -> V2");
    }

    #[test]
    fn test_path_weight() {
        let graph = Graph::from_edges(3, true, &[(0, 1, 4), (1, 2, -1)]).unwrap();
        assert_eq!(path_weight(&graph, &[0, 1, 2], PathKind::Shortest), Some(3));
        assert_eq!(path_weight(&graph, &[1], PathKind::Longest), Some(0));
        assert_eq!(path_weight(&graph, &[0, 2], PathKind::Shortest), None);
    }

    #[test]
    fn test_path_weight_matches_distance_on_parallel_edges() {
        let heavy_first = Graph::from_edges(2, true, &[(0, 1, 5), (0, 1, 2)]).unwrap();
        let shortest = shortest_paths(&heavy_first, 0).unwrap();
        let path = shortest.path_to(1).unwrap();
        assert_eq!(shortest.distance_to(1), Some(2));
        assert_eq!(path_weight(&heavy_first, &path, PathKind::Shortest), shortest.distance_to(1));

        let light_first = Graph::from_edges(2, true, &[(0, 1, 2), (0, 1, 5)]).unwrap();
        let longest = longest_paths(&light_first, 0).unwrap();
        let path = longest.path_to(1).unwrap();
        assert_eq!(longest.distance_to(1), Some(5));
        assert_eq!(path_weight(&light_first, &path, PathKind::Longest), longest.distance_to(1));
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(Some(-4)), "-4");
        assert_eq!(format_distance(None), "unreachable");
    }
}
