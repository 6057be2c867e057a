//! Errors raised while loading benchmark datasets.

use std::{io, path::PathBuf};

use thiserror::Error;

/// An error produced while reading or writing a dataset file.
///
/// Line-oriented variants carry the 1-based line number of the offending
/// record so malformed inputs are easy to locate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatasetError {
    /// File I/O failed.
    #[error("failed to access `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A binary vector file was too short to hold its header.
    #[error("`{path}` is too short to hold a vector-file header")]
    Header { path: PathBuf },
    /// A binary file ended before the payload its header promised.
    #[error("`{path}` is truncated: expected {expected} bytes, found {actual}")]
    Truncated {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },
    /// A text line did not parse as a single float.
    #[error("`{path}` line {line}: expected a single float value")]
    InvalidFloat { path: PathBuf, line: usize },
    /// A range line had no separator producing two parsable floats.
    #[error("`{path}` line {line}: expected `lo-hi` with parsable bounds")]
    MissingSeparator { path: PathBuf, line: usize },
    /// A range line had its bounds out of order.
    #[error("`{path}` line {line}: range lower bound exceeds upper bound")]
    RangeOrder { path: PathBuf, line: usize },
    /// An fvecs record disagreed with the file's first dimension.
    #[error("`{path}` record {record}: dimension {got} does not match {expected}")]
    FvecsDimension {
        path: PathBuf,
        record: usize,
        expected: usize,
        got: usize,
    },
    /// A buffer handed to a writer disagreed with the declared shape.
    #[error("cannot write `{path}`: {values} values do not fill {count} x {dim}")]
    WriteShape {
        path: PathBuf,
        values: usize,
        count: usize,
        dim: usize,
    },
}
