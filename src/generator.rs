use std::fmt;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, instrument};

use crate::config::DEFAULT_SOURCE_VERTEX;
use crate::error::Result;
use crate::types::graph_json::save_graph;
use crate::types::Graph;

/// Size bucket a dataset is written under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Small,
    Medium,
    Large,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Small => f.write_str("small"),
            Tier::Medium => f.write_str("medium"),
            Tier::Large => f.write_str("large"),
        }
    }
}

/// How a dataset's edges are produced.
#[derive(Debug, Clone, Copy)]
enum Shape {
    Fixed(&'static [(usize, usize, i64)]),
    /// Every ordered pair `u != v` gets an edge with this probability
    Dense(f64),
    SparseChain,
}

/// One of the reference datasets.
#[derive(Debug, Clone, Copy)]
pub struct Dataset {
    pub name: &'static str,
    pub tier: Tier,
    pub vertex_count: usize,
    shape: Shape,
}

const SMALL_CYCLIC_1: &[(usize, usize, i64)] = &[
    (0, 1, 3), (1, 2, 2), (2, 3, 4), (3, 1, 1),
    (4, 5, 2), (5, 6, 5), (6, 7, 1),
];

const SMALL_DAG_1: &[(usize, usize, i64)] = &[
    (0, 1, 1), (1, 2, 2), (2, 3, 3), (2, 4, 2),
    (3, 4, 1), (4, 5, 2), (5, 6, 1),
];

const SMALL_DAG_2: &[(usize, usize, i64)] = &[
    (0, 1, 2), (1, 2, 1),
    (3, 4, 3), (4, 5, 1),
    (6, 7, 2), (2, 8, 1), (5, 8, 2), (7, 8, 1), (8, 9, 2),
];

const MEDIUM_MULTIPLE_SCC: &[(usize, usize, i64)] = &[
    (0, 1, 2), (1, 2, 1), (2, 0, 1),
    (3, 4, 2), (4, 5, 1), (5, 3, 2),
    (6, 7, 1), (7, 6, 2),
    (0, 3, 2), (2, 6, 1), (4, 8, 2), (7, 9, 1),
    (8, 10, 1), (9, 10, 2), (10, 11, 1), (11, 12, 2),
    (12, 13, 1), (13, 14, 2), (1, 9, 1), (5, 11, 2),
];

const MEDIUM_DAG: &[(usize, usize, i64)] = &[
    (0, 1, 2), (0, 2, 3), (1, 3, 1), (2, 4, 2), (3, 5, 3), (4, 6, 1),
    (5, 7, 2), (6, 8, 1), (7, 9, 2), (8, 10, 1), (9, 11, 3),
    (10, 12, 2), (11, 13, 1), (12, 14, 2), (13, 15, 1),
];

const LARGE_MIXED_SCC: &[(usize, usize, i64)] = &[
    (0, 1, 1), (1, 2, 2), (2, 0, 3),
    (5, 6, 1), (6, 7, 2), (7, 5, 3),
    (10, 11, 1), (11, 12, 2), (12, 10, 3),
    (2, 5, 1), (7, 10, 2), (12, 15, 3),
    (15, 20, 2), (20, 22, 1), (22, 24, 2),
];

/// The nine reference datasets, in generation order.
pub const DATASETS: [Dataset; 9] = [
    Dataset { name: "small_cyclic_1", tier: Tier::Small, vertex_count: 8, shape: Shape::Fixed(SMALL_CYCLIC_1) },
    Dataset { name: "small_dag_1", tier: Tier::Small, vertex_count: 7, shape: Shape::Fixed(SMALL_DAG_1) },
    Dataset { name: "small_dag_2", tier: Tier::Small, vertex_count: 10, shape: Shape::Fixed(SMALL_DAG_2) },
    Dataset { name: "medium_multiple_scc", tier: Tier::Medium, vertex_count: 15, shape: Shape::Fixed(MEDIUM_MULTIPLE_SCC) },
    Dataset { name: "medium_dag", tier: Tier::Medium, vertex_count: 16, shape: Shape::Fixed(MEDIUM_DAG) },
    Dataset { name: "medium_cyclic_dense", tier: Tier::Medium, vertex_count: 18, shape: Shape::Dense(0.25) },
    Dataset { name: "large_sparse_dag", tier: Tier::Large, vertex_count: 20, shape: Shape::SparseChain },
    Dataset { name: "large_cyclic_dense", tier: Tier::Large, vertex_count: 30, shape: Shape::Dense(0.3) },
    Dataset { name: "large_mixed_scc", tier: Tier::Large, vertex_count: 25, shape: Shape::Fixed(LARGE_MIXED_SCC) },
];

impl Dataset {
    /// Looks a dataset up by name.
    pub fn by_name(name: &str) -> Option<&'static Dataset> {
        DATASETS.iter().find(|dataset| dataset.name == name)
    }

    /// `{dir}/{tier}/{name}.json`
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(self.tier.to_string()).join(format!("{}.json", self.name))
    }

    /// Builds the graph. Only the dense datasets draw from `rng`.
    pub fn build(&self, rng: &mut StdRng) -> Result<Graph> {
        let n = self.vertex_count;
        match self.shape {
            Shape::Fixed(edges) => Graph::from_edges(n, true, edges),
            Shape::Dense(probability) => {
                let mut graph = Graph::new(n, true);
                for u in 0..n {
                    for v in 0..n {
                        if u != v && rng.gen_bool(probability) {
                            graph.add_edge(u, v, rng.gen_range(1..=10))?;
                        }
                    }
                }
                Ok(graph)
            }
            Shape::SparseChain => {
                let mut graph = Graph::new(n, true);
                for i in 0..n.saturating_sub(1) {
                    graph.add_edge(i, i + 1, (i % 5) as i64 + 1)?;
                    if i + 2 < n && i % 3 == 0 {
                        graph.add_edge(i, i + 2, 2)?;
                    }
                }
                Ok(graph)
            }
        }
    }
}

/// Writes every reference dataset under `dir` and returns the written paths.
///
/// Each dense dataset gets its own RNG seeded from `seed` and its position,
/// so the same seed always reproduces the same files.
#[instrument(skip_all, fields(dir = %dir.as_ref().display(), seed = seed))]
pub fn generate_all(dir: impl AsRef<Path>, seed: u64) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();

    let pb = ProgressBar::new(DATASETS.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb.set_message("Generating datasets.");

    let mut written = Vec::with_capacity(DATASETS.len());
    for (index, dataset) in DATASETS.iter().enumerate() {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64));
        let graph = dataset.build(&mut rng)?;
        let path = dataset.path_in(dir);
        save_graph(&graph, &path, DEFAULT_SOURCE_VERTEX)?;

        info!(
            dataset = dataset.name,
            vertices = graph.size(),
            edges = graph.edge_count(),
            "dataset written"
        );
        written.push(path);
        pb.inc(1);
    }

    pb.finish_with_message(format!("{} datasets generated under {}", written.len(), dir.display()));
    Ok(written)
}

#[cfg(test)]
mod test_generator {
    use super::*;
    use crate::algorithms::scc::SCC;
    use crate::algorithms::topo::topological_sort;
    use crate::types::graph_json::load_graph;

    fn build(name: &str, seed: u64) -> Graph {
        let mut rng = StdRng::seed_from_u64(seed);
        Dataset::by_name(name).unwrap().build(&mut rng).unwrap()
    }

    #[test]
    fn test_fixed_datasets() {
        assert_eq!(build("small_cyclic_1", 0).edge_count(), 7);
        assert_eq!(build("medium_multiple_scc", 0).edge_count(), 20);
        assert_eq!(build("large_mixed_scc", 0).edge_count(), 15);

        // {0,1,2}, {3,4,5}, {6,7} plus seven singletons
        assert_eq!(build("medium_multiple_scc", 0).scc().len(), 10);
    }

    #[test]
    fn test_dag_datasets_are_acyclic() {
        for name in ["small_dag_1", "small_dag_2", "medium_dag", "large_sparse_dag"] {
            assert!(topological_sort(&build(name, 0)).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_sparse_chain() {
        // 19 chain edges plus shortcuts from 0, 3, 6, 9, 12, 15
        let graph = build("large_sparse_dag", 0);
        assert_eq!(graph.edge_count(), 25);
        assert_eq!(graph.edges_of(4)[0].weight, 5);
    }

    #[test]
    fn test_dense_is_seeded() {
        let a = build("large_cyclic_dense", 7);
        let b = build("large_cyclic_dense", 7);
        assert_eq!(a, b);
        for edge in a.edges() {
            assert_ne!(edge.from, edge.to);
            assert!((1..=10).contains(&edge.weight));
        }
    }

    #[test]
    fn test_generate_all_writes_tiers() {
        let dir = tempfile::tempdir().unwrap();
        let written = generate_all(dir.path(), 42).unwrap();

        assert_eq!(written.len(), 9);
        assert!(dir.path().join("small/small_dag_1.json").exists());
        assert!(dir.path().join("medium/medium_cyclic_dense.json").exists());
        assert!(dir.path().join("large/large_mixed_scc.json").exists());

        let graph = load_graph(dir.path().join("small/small_dag_2.json")).unwrap();
        assert_eq!(graph.size(), 10);
        assert_eq!(graph.edge_count(), 9);
    }
}
