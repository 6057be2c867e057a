//! Range-filtered approximate nearest-neighbour search.
//!
//! A corpus of fixed-dimension vectors, each tagged with a scalar attribute,
//! is laid out in attribute-sorted order and partitioned by a B-Window
//! Search Tree: nested buckets along the attribute axis, each holding an
//! independent Vamana-style proximity graph. A query supplies a vector, an
//! attribute interval, and a neighbour count; the coordinator picks the
//! narrowest covering buckets, beam-searches each, merges, postfilters edge
//! buckets, and maps results back to original ids.
//!
//! ```
//! use fenestra_core::{DenseCorpus, FenestraBuilder, GraphParams, RangeFilter, SearchParams};
//!
//! let corpus = DenseCorpus::new(
//!     "demo",
//!     (0..64).map(|i| (i % 8) as f32).collect(),
//!     2,
//!     (0..32).map(|i| i as f32).collect(),
//! )?;
//! let index = FenestraBuilder::new()
//!     .with_graph_params(GraphParams::new(4, 8, 1.2)?)
//!     .with_cutoff(8)
//!     .build(&corpus)?;
//! let hits = index.search(
//!     &[1.0, 2.0],
//!     &RangeFilter::new(10.0, 20.0)?,
//!     5,
//!     &SearchParams::new(16)?,
//! )?;
//! assert!(hits.len() <= 5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod axis;
mod builder;
mod distance;
mod error;
mod graph;
mod index;
mod points;
mod source;
mod tree;

pub use crate::{
    builder::FenestraBuilder,
    distance::squared_euclidean,
    error::{CorpusError, CorpusErrorCode, FenestraError, FenestraErrorCode, Result},
    graph::{GraphParams, Neighbour, SearchParams},
    index::{Fenestra, RangeFilter},
    source::{CorpusSource, DenseCorpus},
};
