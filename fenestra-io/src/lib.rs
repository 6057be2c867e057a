//! Dataset loaders for the fenestra benchmark formats.
//!
//! Covers the four external file layouts the benchmark driver consumes --
//! binary vector files, attribute CSVs, query-range CSVs, and ivecs ground
//! truth -- plus the fvecs layout read by the converter. Writers exist for
//! every format so tests and tooling can produce fixtures.

mod attributes;
mod error;
mod groundtruth;
mod ranges;
mod vectors;

pub use crate::{
    attributes::{read_attributes, write_attributes},
    error::DatasetError,
    groundtruth::{read_ground_truth, write_ground_truth},
    ranges::{read_ranges, write_ranges},
    vectors::{read_fvecs, read_vector_set, write_vector_set, VectorSet},
};
