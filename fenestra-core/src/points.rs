//! Attribute-sorted point storage.
//!
//! The builder permutes the corpus so attributes are non-decreasing in
//! storage order; this module owns the resulting `n x dim` row-major buffer.
//! Bucket graphs never copy vectors: they borrow a [`PointRange`] view over a
//! contiguous span of sorted rows.

use crate::distance::squared_euclidean;

/// Densely packed `n x dim` float buffer in attribute-sorted order.
#[derive(Clone, Debug)]
pub(crate) struct PointStore {
    values: Vec<f32>,
    count: usize,
    dim: usize,
}

impl PointStore {
    pub(crate) fn new(values: Vec<f32>, count: usize, dim: usize) -> Self {
        debug_assert_eq!(values.len(), count * dim);
        Self { values, count, dim }
    }

    pub(crate) fn len(&self) -> usize {
        self.count
    }

    pub(crate) fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub(crate) fn point(&self, i: usize) -> &[f32] {
        &self.values[i * self.dim..(i + 1) * self.dim]
    }

    /// Borrows the half-open span `[start, end)` of sorted rows.
    pub(crate) fn range(&self, start: usize, end: usize) -> PointRange<'_> {
        debug_assert!(start <= end && end <= self.count);
        PointRange {
            store: self,
            start,
            end,
        }
    }
}

/// Zero-copy view over a contiguous span of sorted rows, addressed by local
/// ids `0..len`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PointRange<'a> {
    store: &'a PointStore,
    start: usize,
    end: usize,
}

impl PointRange<'_> {
    pub(crate) fn len(&self) -> usize {
        self.end - self.start
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub(crate) fn point(&self, local: usize) -> &[f32] {
        debug_assert!(local < self.len());
        self.store.point(self.start + local)
    }

    #[inline]
    pub(crate) fn distance_to(&self, local: usize, query: &[f32]) -> f32 {
        squared_euclidean(self.point(local), query)
    }

    #[inline]
    pub(crate) fn distance_between(&self, a: usize, b: usize) -> f32 {
        squared_euclidean(self.point(a), self.point(b))
    }
}
