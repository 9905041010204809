//! Error types shared by the graph model, the algorithms and the graph loader.

use std::io;
use std::path::PathBuf;

/// Result type alias for sccdag operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Every failure the library can report.
///
/// All variants are terminal for the operation that produced them: the
/// algorithms are deterministic over in-memory data, so retrying a failed
/// call with the same input yields the same error.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// An edge endpoint or a source vertex lies outside `[0, n)`.
    #[error("vertex {vertex} is out of range for a graph with {vertex_count} vertices")]
    InvalidVertex { vertex: usize, vertex_count: usize },

    /// Kahn's algorithm stopped before ordering every vertex.
    #[error("graph is not a DAG: only {ordered} of {vertex_count} vertices could be ordered")]
    NotADag { ordered: usize, vertex_count: usize },

    /// Relaxing the edge `from -> to` would overflow `i64`.
    #[error("distance overflow while relaxing edge {from} -> {to}")]
    DistanceOverflow { from: usize, to: usize },

    /// An SCC result was paired with a graph of a different size.
    #[error("SCC result covers {scc_vertices} vertices but the graph has {graph_vertices}")]
    SccSizeMismatch { scc_vertices: usize, graph_vertices: usize },

    /// A serialized graph description could not be read or parsed.
    #[error("failed to load graph from {}: {source}", path.display())]
    GraphLoad {
        path: PathBuf,
        #[source]
        source: Box<GraphError>,
    },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration error.
    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl GraphError {
    /// Wraps `self` as the cause of a load failure for `path`.
    pub fn while_loading(self, path: impl Into<PathBuf>) -> Self {
        GraphError::GraphLoad {
            path: path.into(),
            source: Box::new(self),
        }
    }
}
