use std::fmt;

use tracing::{debug, instrument};

use crate::algorithms::topo::topological_sort;
use crate::config::{EDGES_PROCESSED, RELAXATIONS};
use crate::error::{GraphError, Result};
use crate::metrics::Metrics;
use crate::types::Graph;

/// Distance reported for vertices a shortest-path run never reached.
pub const UNREACHABLE_SHORTEST: i64 = i64::MAX;

/// Distance reported for vertices a longest-path run never reached.
pub const UNREACHABLE_LONGEST: i64 = i64::MIN;

/// Which extreme a path computation optimises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    Shortest,
    Longest,
}

impl PathKind {
    /// Distance value stored for unreachable vertices.
    pub fn sentinel(self) -> i64 {
        match self {
            PathKind::Shortest => UNREACHABLE_SHORTEST,
            PathKind::Longest => UNREACHABLE_LONGEST,
        }
    }

    /// Whether `candidate` improves on `current` for this kind.
    fn improves(self, candidate: i64, current: i64) -> bool {
        match self {
            PathKind::Shortest => candidate < current,
            PathKind::Longest => candidate > current,
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKind::Shortest => f.write_str("shortest"),
            PathKind::Longest => f.write_str("longest"),
        }
    }
}

/// Single-source distances over a DAG.
///
/// `dist` keeps the numeric sentinel of [`PathKind::sentinel`] for vertices
/// that were never reached, but reachability itself is tracked by a separate
/// flag, so a legitimate distance equal to an `i64` extreme is never
/// mistaken for "unreachable".
#[derive(Debug, Clone)]
pub struct PathResult {
    kind: PathKind,
    source: usize,
    dist: Vec<i64>,
    reachable: Vec<bool>,
    /// `None` is the "no predecessor" sentinel: the source and unreached vertices
    prev: Vec<Option<usize>>,
    /// Counters and timing of the run
    pub metrics: Metrics,
}

impl PathResult {
    pub fn kind(&self) -> PathKind {
        self.kind
    }

    pub fn source(&self) -> usize {
        self.source
    }

    /// Distance of every vertex, with the sentinel for unreachable ones.
    pub fn dist(&self) -> &[i64] {
        &self.dist
    }

    /// Predecessor of every vertex on its best path.
    pub fn prev(&self) -> &[Option<usize>] {
        &self.prev
    }

    pub fn is_reachable(&self, v: usize) -> bool {
        self.reachable.get(v).copied().unwrap_or(false)
    }

    /// Distance to `v`, `None` if `v` is unreachable or out of range.
    pub fn distance_to(&self, v: usize) -> Option<i64> {
        if self.is_reachable(v) {
            Some(self.dist[v])
        } else {
            None
        }
    }

    /// Vertices of the best path from the source to `target`, source first.
    ///
    /// Returns `None` when `target` is unreachable or out of range.
    pub fn path_to(&self, target: usize) -> Option<Vec<usize>> {
        if !self.is_reachable(target) {
            return None;
        }

        let mut path = vec![target];
        let mut current = target;
        while let Some(previous) = self.prev[current] {
            // A non-topological order passed to `dag_paths` can link
            // predecessors into a loop; a simple path has at most n vertices.
            if path.len() >= self.prev.len() {
                return None;
            }
            path.push(previous);
            current = previous;
        }
        path.reverse();
        Some(path)
    }

    /// Number of vertices reached from the source, the source included.
    pub fn reachable_count(&self) -> usize {
        self.reachable.iter().filter(|&&r| r).count()
    }
}

impl fmt::Display for PathResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} paths from {}:", self.kind, self.source)?;
        for v in 0..self.dist.len() {
            match self.distance_to(v) {
                Some(d) => writeln!(f, "  {} -> {}: {}", self.source, v, d)?,
                None => writeln!(f, "  {} -> {}: unreachable", self.source, v)?,
            }
        }
        Ok(())
    }
}

/// Shortest distances from `source`, sorting `dag` topologically first.
///
/// # Errors
/// * `InvalidVertex` if `source` is out of range.
/// * `NotADag` if `dag` has a cycle.
/// * `DistanceOverflow` if a distance leaves the `i64` range.
pub fn shortest_paths(dag: &Graph, source: usize) -> Result<PathResult> {
    sorted_dag_paths(dag, source, PathKind::Shortest)
}

/// Longest distances from `source`, sorting `dag` topologically first.
///
/// Errors as for [`shortest_paths`].
pub fn longest_paths(dag: &Graph, source: usize) -> Result<PathResult> {
    sorted_dag_paths(dag, source, PathKind::Longest)
}

/// Shortest distances from `source` along a precomputed topological order.
pub fn shortest_paths_with_order(dag: &Graph, order: &[usize], source: usize) -> Result<PathResult> {
    dag_paths(dag, order, source, PathKind::Shortest)
}

/// Longest distances from `source` along a precomputed topological order.
pub fn longest_paths_with_order(dag: &Graph, order: &[usize], source: usize) -> Result<PathResult> {
    dag_paths(dag, order, source, PathKind::Longest)
}

fn sorted_dag_paths(dag: &Graph, source: usize, kind: PathKind) -> Result<PathResult> {
    dag.check_vertex(source)?;
    let topo = topological_sort(dag)?;
    dag_paths(dag, topo.order(), source, kind)
}

/// Relaxes every edge of `dag` once, visiting tails in `order`.
///
/// `order` must be a topological order of `dag`; this is only checked for
/// length and range, since a cyclic graph has already been rejected by the
/// topological sort that produced it.
#[instrument(skip_all, fields(vertices = dag.size(), source = source, kind = %kind))]
pub fn dag_paths(dag: &Graph, order: &[usize], source: usize, kind: PathKind) -> Result<PathResult> {
    let n = dag.size();
    dag.check_vertex(source)?;
    if order.len() != n {
        return Err(GraphError::NotADag {
            ordered: order.len(),
            vertex_count: n,
        });
    }
    if let Some(&bad) = order.iter().find(|&&v| v >= n) {
        return Err(GraphError::InvalidVertex {
            vertex: bad,
            vertex_count: n,
        });
    }

    let mut metrics = Metrics::new();
    metrics.start_timer();

    let mut dist = vec![kind.sentinel(); n];
    let mut reachable = vec![false; n];
    let mut prev: Vec<Option<usize>> = vec![None; n];
    dist[source] = 0;
    reachable[source] = true;

    for &u in order {
        // Children of an unreached vertex are never relaxed from it.
        if !reachable[u] {
            continue;
        }

        for edge in dag.edges_of(u) {
            metrics.increment(EDGES_PROCESSED);

            let candidate = dist[u]
                .checked_add(edge.weight)
                .ok_or(GraphError::DistanceOverflow {
                    from: u,
                    to: edge.to,
                })?;

            if !reachable[edge.to] || kind.improves(candidate, dist[edge.to]) {
                dist[edge.to] = candidate;
                reachable[edge.to] = true;
                prev[edge.to] = Some(u);
                metrics.increment(RELAXATIONS);
            }
        }
    }

    metrics.stop_timer();
    debug!(
        relaxations = metrics.counter(RELAXATIONS),
        elapsed_us = metrics.elapsed().as_micros() as u64,
        "dag path computation finished"
    );

    Ok(PathResult {
        kind,
        source,
        dist,
        reachable,
        prev,
        metrics,
    })
}
