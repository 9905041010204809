use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algorithms::condensation::CondensationWeight;
use crate::error::Result;

/// Capacity of the buffered reader used when loading graph descriptions.
pub const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Source vertex used when neither the config file nor the command line names one.
pub const DEFAULT_SOURCE_VERTEX: usize = 0;

/// Directory the dataset generator writes into by default.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Seed for the randomly generated datasets.
pub const DEFAULT_GENERATOR_SEED: u64 = 42;

// Counter names shared by the algorithms and their tests.
pub const EDGES_PROCESSED: &str = "Edges processed";
pub const RELAXATIONS: &str = "Relaxations";
pub const DFS1_VISITS: &str = "DFS1 visits";
pub const DFS2_VISITS: &str = "DFS2 visits";
pub const QUEUE_PUSHES: &str = "Queue pushes";
pub const QUEUE_POPS: &str = "Queue pops";
pub const CONDENSED_EDGES: &str = "Condensed edges";
pub const DROPPED_INTRA_EDGES: &str = "Dropped intra-component edges";
pub const MERGED_PARALLEL_EDGES: &str = "Merged parallel edges";

/// Settings for one analysis run.
///
/// Every field is optional in the YAML file; missing fields fall back to
/// [`RunConfig::default`]. Command-line flags are applied on top of the
/// loaded value by the binary.
///
/// ```yaml
/// dataset: data/small/small_dag_1.json
/// source_vertex: 0
/// target_vertex: 6
/// condensation_weight: min
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Path of the JSON graph description.
    pub dataset: Option<String>,

    /// Source vertex of the path computations (original vertex id).
    pub source_vertex: usize,

    /// Vertex whose reconstructed path is printed, if any.
    pub target_vertex: Option<usize>,

    /// How parallel inter-component edges are merged in the condensation.
    pub condensation_weight: CondensationWeight,

    /// Output directory of the dataset generator.
    pub output_dir: String,

    /// Seed for the randomly generated datasets.
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dataset: None,
            source_vertex: DEFAULT_SOURCE_VERTEX,
            target_vertex: None,
            condensation_weight: CondensationWeight::default(),
            output_dir: DEFAULT_DATA_DIR.to_string(),
            seed: DEFAULT_GENERATOR_SEED,
        }
    }
}

impl RunConfig {
    /// Parses a run configuration from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Reads and parses a YAML run configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }
}
