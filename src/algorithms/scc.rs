use std::fmt;

use tracing::{debug, instrument};

use crate::config::{DFS1_VISITS, DFS2_VISITS, EDGES_PROCESSED};
use crate::metrics::Metrics;
use crate::types::Graph;

/// Trait for computing Strongly Connected Components (SCC) in a graph
///
/// A strongly connected component is a maximal set of vertices in which every
/// vertex is reachable from every other vertex.
pub trait SCC {
    /// Decomposes the graph into its strongly connected components.
    fn scc(&self) -> SCCResult;
}

impl SCC for Graph {
    fn scc(&self) -> SCCResult {
        kosaraju(self)
    }
}

/// Strongly connected components of a graph.
///
/// Components are numbered `0..k` in the order the second Kosaraju pass
/// discovers them. Because that pass walks vertices by decreasing finishing
/// time, the numbering is a topological order of the condensation: every
/// condensation edge `a -> b` satisfies `a < b`, and listing the ids from
/// `k - 1` down to `0` gives the reverse topological order.
#[derive(Debug, Clone)]
pub struct SCCResult {
    /// Components in discovery order; vertices in second-pass visit order
    components: Vec<Vec<usize>>,

    /// `component_of[v]` is the id of the component containing `v`
    component_of: Vec<usize>,

    /// `true` for components that contain a cycle (size > 1 or a self-loop)
    cyclic: Vec<bool>,

    /// Counters and timing of the run that produced this result
    pub metrics: Metrics,
}

impl SCCResult {
    pub fn components(&self) -> &[Vec<usize>] {
        &self.components
    }

    /// The vertex -> component id map.
    pub fn component_of(&self) -> &[usize] {
        &self.component_of
    }

    /// Component id of vertex `v`, or `None` if `v` is out of range.
    pub fn component_of_vertex(&self, v: usize) -> Option<usize> {
        self.component_of.get(v).copied()
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Size of every component, by component id.
    pub fn sizes(&self) -> Vec<usize> {
        self.components.iter().map(|c| c.len()).collect()
    }

    /// Whether the component contains a cycle.
    pub fn is_cyclic(&self, component: usize) -> bool {
        self.cyclic.get(component).copied().unwrap_or(false)
    }
}

impl fmt::Display for SCCResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SCCs found: {}", self.components.len())?;
        for (id, component) in self.components.iter().enumerate() {
            writeln!(
                f,
                "Component {} (size {}): {:?}",
                id,
                component.len(),
                component
            )?;
        }
        Ok(())
    }
}

/// Computes strongly connected components with Kosaraju's two-pass algorithm.
///
/// # Algorithm
///
/// 1. Depth-first search over the original graph, starting from every
///    unvisited vertex in increasing id order, recording vertices in the
///    order their subtrees finish.
/// 2. Build the reversed graph.
/// 3. Take vertices in reverse finishing order; each one still unvisited
///    starts a depth-first search on the reversed graph, and everything it
///    reaches forms the next component.
///
/// Both searches use an explicit frame stack instead of recursion, so deep
/// graphs cannot exhaust the call stack. Each frame remembers the index of
/// the next edge to examine, which reproduces the finishing sequence (and
/// the second-pass visit order) of the recursive formulation exactly.
///
/// # Time Complexity
///
/// * O(V + E)
#[instrument(skip_all, fields(vertices = graph.size(), edges = graph.edge_count()))]
pub fn kosaraju(graph: &Graph) -> SCCResult {
    let mut metrics = Metrics::new();
    metrics.start_timer();

    let n = graph.size();

    // Pass 1: finishing order on the original graph
    let mut visited = vec![false; n];
    let mut finish_order = Vec::with_capacity(n);
    for start in 0..n {
        if !visited[start] {
            depth_first(graph, start, &mut visited, &mut metrics, DFS1_VISITS, |event| {
                if let Visit::Finish(v) = event {
                    finish_order.push(v);
                }
            });
        }
    }

    // Pass 2: collect components on the reversed graph
    let reversed = graph.reversed();
    visited.fill(false);
    let mut components: Vec<Vec<usize>> = Vec::new();
    let mut component_of = vec![usize::MAX; n];

    for &root in finish_order.iter().rev() {
        if visited[root] {
            continue;
        }

        let id = components.len();
        let mut component = Vec::new();
        depth_first(&reversed, root, &mut visited, &mut metrics, DFS2_VISITS, |event| {
            if let Visit::Enter(v) = event {
                component.push(v);
            }
        });

        for &v in &component {
            component_of[v] = id;
        }
        components.push(component);
    }

    let cyclic = components
        .iter()
        .map(|component| match component.as_slice() {
            [only] => graph.edges_of(*only).iter().any(|e| e.to == *only),
            _ => true,
        })
        .collect();

    metrics.stop_timer();
    debug!(
        components = components.len(),
        elapsed_us = metrics.elapsed().as_micros() as u64,
        "kosaraju finished"
    );

    SCCResult {
        components,
        component_of,
        cyclic,
        metrics,
    }
}

/// Traversal events reported by [`depth_first`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    /// The vertex was reached for the first time
    Enter(usize),
    /// Every outgoing edge of the vertex has been examined
    Finish(usize),
}

/// Non-recursive depth-first search from `start`.
///
/// Marks reached vertices in `visited`, counts them under `visit_counter`
/// and counts every examined edge under `Edges processed`. `on_visit` sees
/// the same enter/finish sequence a recursive search would produce.
fn depth_first<F>(
    graph: &Graph,
    start: usize,
    visited: &mut [bool],
    metrics: &mut Metrics,
    visit_counter: &str,
    mut on_visit: F,
) where
    F: FnMut(Visit),
{
    // (vertex, index of the next outgoing edge to examine)
    let mut frames: Vec<(usize, usize)> = vec![(start, 0)];
    visited[start] = true;
    metrics.increment(visit_counter);
    on_visit(Visit::Enter(start));

    while let Some(frame) = frames.last_mut() {
        let (v, next) = *frame;
        let edges = graph.edges_of(v);

        if next == edges.len() {
            frames.pop();
            on_visit(Visit::Finish(v));
            continue;
        }

        frame.1 += 1;
        metrics.increment(EDGES_PROCESSED);

        let to = edges[next].to;
        if !visited[to] {
            visited[to] = true;
            metrics.increment(visit_counter);
            on_visit(Visit::Enter(to));
            frames.push((to, 0));
        }
    }
}
