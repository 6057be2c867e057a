//! Corpus abstractions consumed by the index builder.

use crate::error::CorpusError;

/// Abstraction over a collection of fixed-dimension points, each tagged with
/// a scalar attribute.
///
/// Implementations must keep `point` and `attribute` consistent: index `i`
/// always refers to the same corpus entry. Indices passed to either accessor
/// are guaranteed by callers to lie in `0..len()`; implementations may panic
/// on anything else.
///
/// # Examples
/// ```
/// use fenestra_core::{CorpusSource, DenseCorpus};
///
/// let corpus = DenseCorpus::new(
///     "demo",
///     vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0],
///     2,
///     vec![10.0, 20.0, 30.0],
/// )?;
/// assert_eq!(corpus.len(), 3);
/// assert_eq!(corpus.point(1), &[1.0, 1.0]);
/// assert_eq!(corpus.attribute(2), 30.0);
/// # Ok::<(), fenestra_core::CorpusError>(())
/// ```
pub trait CorpusSource {
    /// Returns the number of points in the corpus.
    fn len(&self) -> usize;

    /// Returns whether the corpus contains no points.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the dimension of every point.
    fn dim(&self) -> usize;

    /// Returns a human-readable name used in error reports.
    fn name(&self) -> &str;

    /// Returns the coordinates of point `i`.
    fn point(&self, i: usize) -> &[f32];

    /// Returns the scalar attribute of point `i`.
    fn attribute(&self, i: usize) -> f32;
}

/// An owned, densely packed corpus: `len * dim` row-major floats plus one
/// attribute per point.
///
/// Construction validates the shape once so the builder can index freely.
#[derive(Clone, Debug)]
pub struct DenseCorpus {
    name: String,
    values: Vec<f32>,
    dim: usize,
    attributes: Vec<f32>,
}

impl DenseCorpus {
    /// Builds a corpus from raw row-major values and per-point attributes.
    ///
    /// # Errors
    /// Returns [`CorpusError::ZeroDimension`] when `dim == 0`,
    /// [`CorpusError::EmptyData`] when `values` is empty,
    /// [`CorpusError::ShapeMismatch`] when `values.len()` is not a multiple of
    /// `dim`, [`CorpusError::AttributeCountMismatch`] when the attribute count
    /// differs from the point count, and
    /// [`CorpusError::NonFiniteAttribute`] for NaN or infinite attributes.
    pub fn new(
        name: impl Into<String>,
        values: Vec<f32>,
        dim: usize,
        attributes: Vec<f32>,
    ) -> Result<Self, CorpusError> {
        if dim == 0 {
            return Err(CorpusError::ZeroDimension);
        }
        if values.is_empty() {
            return Err(CorpusError::EmptyData);
        }
        if values.len() % dim != 0 {
            return Err(CorpusError::ShapeMismatch {
                values: values.len(),
                points: values.len() / dim,
                dim,
            });
        }
        let points = values.len() / dim;
        if attributes.len() != points {
            return Err(CorpusError::AttributeCountMismatch {
                points,
                attributes: attributes.len(),
            });
        }
        if let Some(index) = attributes.iter().position(|value| !value.is_finite()) {
            return Err(CorpusError::NonFiniteAttribute {
                index,
                value: attributes[index],
            });
        }
        Ok(Self {
            name: name.into(),
            values,
            dim,
            attributes,
        })
    }

    /// Returns the attribute values in corpus order.
    #[must_use]
    pub fn attributes(&self) -> &[f32] {
        &self.attributes
    }
}

impl CorpusSource for DenseCorpus {
    fn len(&self) -> usize {
        self.attributes.len()
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn point(&self, i: usize) -> &[f32] {
        &self.values[i * self.dim..(i + 1) * self.dim]
    }

    fn attribute(&self, i: usize) -> f32 {
        self.attributes[i]
    }
}
