//! Error types for the fenestra core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

/// Stable codes describing [`CorpusError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum CorpusErrorCode {
    /// Value buffer length was not `points * dim`.
    ShapeMismatch,
    /// Attribute count did not match the point count.
    AttributeCountMismatch,
    /// Points must have positive dimension.
    ZeroDimension,
    /// Corpus contained no points.
    EmptyData,
    /// An attribute value was NaN or infinite.
    NonFiniteAttribute,
    /// Requested index was outside the corpus bounds.
    OutOfBounds,
}

impl CorpusErrorCode {
    /// Return the stable machine-readable representation of this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShapeMismatch => "CORPUS_SHAPE_MISMATCH",
            Self::AttributeCountMismatch => "CORPUS_ATTRIBUTE_COUNT_MISMATCH",
            Self::ZeroDimension => "CORPUS_ZERO_DIMENSION",
            Self::EmptyData => "CORPUS_EMPTY",
            Self::NonFiniteAttribute => "CORPUS_NON_FINITE_ATTRIBUTE",
            Self::OutOfBounds => "CORPUS_OUT_OF_BOUNDS",
        }
    }
}

impl fmt::Display for CorpusErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error produced while validating or reading a corpus.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CorpusError {
    /// Value buffer length was not `points * dim`.
    #[error("value buffer holds {values} floats, but {points} points of dimension {dim} need {}", .points * .dim)]
    ShapeMismatch {
        values: usize,
        points: usize,
        dim: usize,
    },
    /// Attribute count did not match the point count.
    #[error("corpus has {points} points but {attributes} attribute values")]
    AttributeCountMismatch { points: usize, attributes: usize },
    /// Points must have positive dimension.
    #[error("corpus points must have positive dimension")]
    ZeroDimension,
    /// Corpus contained no points.
    #[error("corpus contains no points")]
    EmptyData,
    /// An attribute value was NaN or infinite.
    #[error("attribute {index} is not finite ({value})")]
    NonFiniteAttribute { index: usize, value: f32 },
    /// Requested index was outside the corpus bounds.
    #[error("index {index} is out of bounds")]
    OutOfBounds { index: usize },
}

impl CorpusError {
    /// Retrieve the stable [`CorpusErrorCode`] for this error.
    pub const fn code(&self) -> CorpusErrorCode {
        match self {
            Self::ShapeMismatch { .. } => CorpusErrorCode::ShapeMismatch,
            Self::AttributeCountMismatch { .. } => CorpusErrorCode::AttributeCountMismatch,
            Self::ZeroDimension => CorpusErrorCode::ZeroDimension,
            Self::EmptyData => CorpusErrorCode::EmptyData,
            Self::NonFiniteAttribute { .. } => CorpusErrorCode::NonFiniteAttribute,
            Self::OutOfBounds { .. } => CorpusErrorCode::OutOfBounds,
        }
    }
}

/// Stable codes describing [`FenestraError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum FenestraErrorCode {
    /// A build or search parameter failed validation.
    InvalidParameters,
    /// The supplied corpus contained no points.
    EmptySource,
    /// The query vector's dimension did not match the corpus.
    DimensionMismatch,
    /// A range filter had NaN bounds or `lo > hi`.
    InvalidRange,
    /// The corpus failed validation while building the index.
    CorpusFailure,
}

impl FenestraErrorCode {
    /// Return the stable machine-readable representation of this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidParameters => "FENESTRA_INVALID_PARAMETERS",
            Self::EmptySource => "FENESTRA_EMPTY_SOURCE",
            Self::DimensionMismatch => "FENESTRA_DIMENSION_MISMATCH",
            Self::InvalidRange => "FENESTRA_INVALID_RANGE",
            Self::CorpusFailure => "FENESTRA_CORPUS_FAILURE",
        }
    }
}

impl fmt::Display for FenestraErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type produced when building or querying a [`crate::Fenestra`] index.
///
/// Disjoint query ranges and under-filled result lists are not errors: the
/// search simply returns fewer neighbours than requested.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FenestraError {
    /// A build or search parameter failed validation.
    #[error("invalid parameter: {reason}")]
    InvalidParameters { reason: String },
    /// The supplied corpus contained no points.
    #[error("corpus `{data_source}` contains no points")]
    EmptySource { data_source: Arc<str> },
    /// The query vector's dimension did not match the corpus.
    #[error("query has dimension {got} but the corpus has dimension {expected}")]
    DimensionMismatch { expected: usize, got: usize },
    /// A range filter had NaN bounds or `lo > hi`.
    #[error("invalid attribute range [{lo}, {hi}]")]
    InvalidRange { lo: f32, hi: f32 },
    /// The corpus failed validation while building the index.
    #[error("corpus `{data_source}` failed: {error}")]
    Corpus {
        data_source: Arc<str>,
        #[source]
        error: CorpusError,
    },
}

impl FenestraError {
    /// Retrieve the stable [`FenestraErrorCode`] for this error.
    pub const fn code(&self) -> FenestraErrorCode {
        match self {
            Self::InvalidParameters { .. } => FenestraErrorCode::InvalidParameters,
            Self::EmptySource { .. } => FenestraErrorCode::EmptySource,
            Self::DimensionMismatch { .. } => FenestraErrorCode::DimensionMismatch,
            Self::InvalidRange { .. } => FenestraErrorCode::InvalidRange,
            Self::Corpus { .. } => FenestraErrorCode::CorpusFailure,
        }
    }

    /// Retrieve the inner [`CorpusErrorCode`] when the error originated in the corpus.
    pub const fn corpus_code(&self) -> Option<CorpusErrorCode> {
        match self {
            Self::Corpus { error, .. } => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, FenestraError>;
