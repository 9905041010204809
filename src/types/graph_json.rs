use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::READ_BUFFER_SIZE;
use crate::error::{GraphError, Result};
use crate::types::Graph;

/// One edge record of the JSON graph description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub u: usize,
    pub v: usize,
    pub w: i64,
}

/// The on-disk JSON description of a graph.
///
/// # Format
///
/// {
///   "directed": true,
///   "n": 8,
///   "edges": [ { "u": 0, "v": 1, "w": 3 }, { "u": 1, "v": 2, "w": 2 } ],
///   "source": 0,
///   "weight_model": "edge"
/// }
///
/// `source` and `weight_model` are optional and default to `0` and `"edge"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub directed: bool,
    pub n: usize,
    pub edges: Vec<EdgeRecord>,
    #[serde(default)]
    pub source: usize,
    #[serde(default = "default_weight_model")]
    pub weight_model: String,
}

fn default_weight_model() -> String {
    "edge".to_string()
}

impl GraphDocument {
    /// Describes `graph`, listing its stored edges vertex by vertex.
    ///
    /// An undirected graph stores each edge twice; only the copy with
    /// `u <= v` is written so that loading the document rebuilds the same
    /// adjacency lists.
    pub fn from_graph(graph: &Graph, source: usize) -> Self {
        let edges = graph
            .edges()
            .filter(|edge| graph.is_directed() || edge.from <= edge.to)
            .map(|edge| EdgeRecord {
                u: edge.from,
                v: edge.to,
                w: edge.weight,
            })
            .collect();

        Self {
            directed: graph.is_directed(),
            n: graph.size(),
            edges,
            source,
            weight_model: default_weight_model(),
        }
    }

    /// Builds the graph, inserting edges in document order.
    ///
    /// # Errors
    /// * `InvalidVertex` for the first edge with an endpoint outside `[0, n)`.
    pub fn to_graph(&self) -> Result<Graph> {
        let mut graph = Graph::new(self.n, self.directed);
        for edge in &self.edges {
            graph.add_edge(edge.u, edge.v, edge.w)?;
        }
        Ok(graph)
    }
}

/// Reads a JSON graph description from `path`.
///
/// Any IO, parse or validation failure is reported as `GraphLoad` with the
/// underlying error as its source.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_document(path: impl AsRef<Path>) -> Result<GraphDocument> {
    let path = path.as_ref();
    let read = || -> Result<GraphDocument> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
        Ok(serde_json::from_reader(reader)?)
    };
    read().map_err(|err| err.while_loading(path))
}

/// Reads a JSON graph description from `path` and builds the graph.
pub fn load_graph(path: impl AsRef<Path>) -> Result<Graph> {
    let path = path.as_ref();
    let document = load_document(path)?;
    let graph = document.to_graph().map_err(|err| err.while_loading(path))?;
    debug!(
        vertices = graph.size(),
        edges = graph.edge_count(),
        directed = graph.is_directed(),
        "graph loaded"
    );
    Ok(graph)
}

/// Writes `graph` as pretty-printed JSON, creating parent directories.
pub fn save_graph(graph: &Graph, path: impl AsRef<Path>, source: usize) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let document = GraphDocument::from_graph(graph, source);
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &document)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Parses a JSON graph description held in memory.
pub fn parse_graph(text: &str) -> Result<Graph> {
    let document: GraphDocument = serde_json::from_str(text)?;
    document.to_graph()
}
