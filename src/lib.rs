pub mod algorithms;
pub mod config;
pub mod error;
pub mod generator;
pub mod metrics;
pub mod types;
pub mod util;

pub use error::{GraphError, Result};
pub use metrics::Metrics;
pub use types::{Edge, Graph};
