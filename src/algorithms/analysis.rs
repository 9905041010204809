use std::fmt::Write;

use tracing::{info, instrument, warn};

use crate::algorithms::condensation::{build_condensation, Condensation, CondensationWeight};
use crate::algorithms::path::{longest_paths_with_order, shortest_paths_with_order, PathResult};
use crate::algorithms::scc::{kosaraju, SCCResult};
use crate::algorithms::topo::{topological_sort, TopoResult};
use crate::error::{GraphError, Result};
use crate::types::Graph;
use crate::util::format_path;

/// Knobs for [`analyze`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Weight policy for parallel inter-component edges
    pub condensation_weight: CondensationWeight,
}

impl AnalysisOptions {
    pub fn with_weight(condensation_weight: CondensationWeight) -> Self {
        AnalysisOptions { condensation_weight }
    }
}

/// Every intermediate result of one end-to-end run.
///
/// The topological order and both path results refer to the condensation,
/// whose vertex `c` is component `c` of `scc`. Use
/// [`Analysis::component_of`] to translate original vertex ids.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub scc: SCCResult,
    pub condensation: Condensation,
    pub topo: TopoResult,
    pub shortest: PathResult,
    pub longest: PathResult,
    /// Original vertex the paths were computed from
    pub source_vertex: usize,
}

impl Analysis {
    /// Component (condensation vertex) containing the original vertex `v`.
    pub fn component_of(&self, v: usize) -> Option<usize> {
        self.scc.component_of_vertex(v)
    }

    /// Component id of the source vertex.
    pub fn source_component(&self) -> usize {
        self.shortest.source()
    }

    /// Shortest distance from the source's component to `v`'s component.
    pub fn shortest_distance_to(&self, v: usize) -> Option<i64> {
        self.shortest.distance_to(self.component_of(v)?)
    }

    /// Longest distance from the source's component to `v`'s component.
    pub fn longest_distance_to(&self, v: usize) -> Option<i64> {
        self.longest.distance_to(self.component_of(v)?)
    }

    /// Shortest and longest distance to the original vertex `v`.
    ///
    /// # Errors
    /// * `InvalidVertex` if `v` is not a vertex of the analysed graph.
    pub fn distances_to(&self, v: usize) -> Result<(Option<i64>, Option<i64>)> {
        let vertex_count = self.scc.component_of().len();
        if v >= vertex_count {
            return Err(GraphError::InvalidVertex { vertex: v, vertex_count });
        }
        Ok((self.shortest_distance_to(v), self.longest_distance_to(v)))
    }

    /// Renders a human-readable summary of every stage.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let dag = &self.condensation.dag;

        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}", self.scc);
        let _ = writeln!(
            out,
            "Condensation: {} vertices, {} edges",
            dag.size(),
            dag.edge_count()
        );
        let _ = writeln!(out, "Topological order: {:?}", self.topo.order());
        let _ = writeln!(
            out,
            "Source vertex {} lies in component {}",
            self.source_vertex,
            self.source_component()
        );

        for result in [&self.shortest, &self.longest] {
            let _ = writeln!(out, "{} distances:", result.kind());
            for component in 0..dag.size() {
                match result.path_to(component) {
                    Some(path) => {
                        let _ = writeln!(
                            out,
                            "  C{}: {} via {}",
                            component,
                            result.dist()[component],
                            format_path(&path)
                        );
                    }
                    None => {
                        let _ = writeln!(out, "  C{}: unreachable", component);
                    }
                }
            }
        }

        for (stage, metrics) in [
            ("SCC", &self.scc.metrics),
            ("Condensation", &self.condensation.metrics),
            ("Topological sort", &self.topo.metrics),
            ("Shortest paths", &self.shortest.metrics),
            ("Longest paths", &self.longest.metrics),
        ] {
            let _ = writeln!(out, "[{}]\n{}", stage, metrics);
        }

        out
    }
}

/// Runs the whole pipeline on `graph` from the original vertex `source`.
///
/// # Steps
///
/// 1. Strongly connected components (Kosaraju).
/// 2. Condensation DAG, merging parallel inter-component edges with
///    `options.condensation_weight`.
/// 3. Topological order of the condensation (Kahn).
/// 4. Shortest and longest distances over the condensation from the
///    component of `source`, both sharing the order from step 3.
///
/// # Errors
/// * `InvalidVertex` if `source` is out of range.
/// * `NotADag` if the condensation is cyclic, which indicates a bug in the
///   decomposition rather than bad input.
/// * `DistanceOverflow` from either path computation.
#[instrument(skip_all, fields(vertices = graph.size(), edges = graph.edge_count(), source = source))]
pub fn analyze(graph: &Graph, source: usize, options: AnalysisOptions) -> Result<Analysis> {
    graph.check_vertex(source)?;

    let scc = kosaraju(graph);
    let condensation = build_condensation(graph, &scc, options.condensation_weight)?;
    let topo = topological_sort(&condensation.dag)?;

    let source_component = scc.component_of()[source];
    let shortest = shortest_paths_with_order(&condensation.dag, topo.order(), source_component)?;
    let longest = longest_paths_with_order(&condensation.dag, topo.order(), source_component)?;

    let unreachable = condensation.dag.size() - shortest.reachable_count();
    if unreachable > 0 {
        warn!(unreachable, "some components are unreachable from the source");
    }
    info!(
        components = scc.len(),
        condensed_edges = condensation.dag.edge_count(),
        "analysis finished"
    );

    Ok(Analysis {
        scc,
        condensation,
        topo,
        shortest,
        longest,
        source_vertex: source,
    })
}
