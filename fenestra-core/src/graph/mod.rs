//! Per-bucket proximity graphs: a Vamana-style builder and the beam search
//! that serves both construction and queries.

mod build;
mod params;
mod search;
mod types;

pub use params::{GraphParams, SearchParams};
pub use types::Neighbour;

pub(crate) use build::build_graph;
pub(crate) use search::{beam_search, BeamSpec};
pub(crate) use types::ProximityGraph;
