pub mod analysis;
pub mod condensation;
pub mod path;
pub mod scc;
pub mod topo;
