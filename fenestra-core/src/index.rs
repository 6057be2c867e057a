//! The query coordinator: translates an attribute-filtered query into
//! covering buckets, dispatches beam searches, merges, postfilters, and maps
//! ids back out.

use crate::{
    axis::AttributeAxis,
    error::FenestraError,
    graph::{beam_search, BeamSpec, Neighbour, SearchParams},
    points::PointStore,
    tree::WindowTree,
    Result,
};

/// A closed attribute interval `[lo, hi]` constraining a query.
///
/// Infinite bounds are allowed, so `RangeFilter::new(f32::NEG_INFINITY,
/// f32::INFINITY)` expresses the unfiltered query.
///
/// # Examples
/// ```
/// use fenestra_core::RangeFilter;
///
/// let filter = RangeFilter::new(3.0, 8.5)?;
/// assert_eq!(filter.lo(), 3.0);
/// assert!(RangeFilter::new(4.0, 2.0).is_err());
/// # Ok::<(), fenestra_core::FenestraError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeFilter {
    lo: f32,
    hi: f32,
}

impl RangeFilter {
    /// Creates a filter over `[lo, hi]`.
    ///
    /// # Errors
    /// Returns [`FenestraError::InvalidRange`] when either bound is NaN or
    /// `lo > hi`.
    pub fn new(lo: f32, hi: f32) -> Result<Self> {
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return Err(FenestraError::InvalidRange { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    /// Returns the lower bound.
    #[must_use]
    pub fn lo(&self) -> f32 {
        self.lo
    }

    /// Returns the upper bound.
    #[must_use]
    pub fn hi(&self) -> f32 {
        self.hi
    }
}

/// An immutable range-filtered ANN index.
///
/// Built once by [`crate::FenestraBuilder`]; afterwards every structure is
/// read-only, so queries share it freely across threads.
#[derive(Clone, Debug)]
pub struct Fenestra {
    store: PointStore,
    axis: AttributeAxis,
    tree: WindowTree,
}

impl Fenestra {
    pub(crate) fn new(store: PointStore, axis: AttributeAxis, tree: WindowTree) -> Self {
        Self { store, axis, tree }
    }

    /// Returns the number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns whether the index holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    /// Returns the point dimension.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.store.dim()
    }

    /// Returns the number of tree levels, including the root level.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.tree.level_count()
    }

    /// Returns the bucket offsets of `level`, or `None` for an absent level.
    ///
    /// Offsets start at `0`, end at `len()`, and are strictly increasing for
    /// non-degenerate partitions.
    #[must_use]
    pub fn bucket_offsets(&self, level: usize) -> Option<&[usize]> {
        (level < self.tree.level_count()).then(|| self.tree.offsets(level))
    }

    /// Returns the largest out-degree over all bucket graphs.
    #[must_use]
    pub fn max_out_degree(&self) -> usize {
        self.tree.max_out_degree()
    }

    /// Returns the attribute values in sorted storage order.
    #[must_use]
    pub fn sorted_attributes(&self) -> &[f32] {
        self.axis.values()
    }

    /// Returns the sorted-id to original-id permutation.
    #[must_use]
    pub fn decode(&self) -> &[usize] {
        self.axis.decode()
    }

    /// Finds up to `k` near neighbours of `query` whose attribute lies in
    /// `filter`, ordered by ascending distance (ties by ascending id).
    ///
    /// A filter disjoint from the corpus attributes yields an empty result,
    /// and buckets holding fewer than `k` qualifying points yield fewer than
    /// `k` neighbours; neither is an error. Returned ids are original corpus
    /// ids.
    ///
    /// # Errors
    /// Returns [`FenestraError::DimensionMismatch`] when `query` does not
    /// match the corpus dimension.
    ///
    /// # Examples
    /// ```
    /// use fenestra_core::{DenseCorpus, FenestraBuilder, GraphParams, RangeFilter, SearchParams};
    ///
    /// let corpus = DenseCorpus::new(
    ///     "demo",
    ///     (0..16).map(|i| i as f32).collect(),
    ///     1,
    ///     (0..16).map(|i| i as f32).collect(),
    /// )?;
    /// let index = FenestraBuilder::new()
    ///     .with_graph_params(GraphParams::new(4, 8, 1.2)?)
    ///     .with_cutoff(4)
    ///     .build(&corpus)?;
    ///
    /// let hits = index.search(
    ///     &[5.2],
    ///     &RangeFilter::new(4.0, 9.0)?,
    ///     3,
    ///     &SearchParams::new(8)?,
    /// )?;
    /// assert_eq!(hits.first().map(|n| n.id), Some(5));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn search(
        &self,
        query: &[f32],
        filter: &RangeFilter,
        k: usize,
        params: &SearchParams,
    ) -> Result<Vec<Neighbour>> {
        if query.len() != self.store.dim() {
            return Err(FenestraError::DimensionMismatch {
                expected: self.store.dim(),
                got: query.len(),
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }
        if filter.hi() < self.axis.first() || filter.lo() > self.axis.last() {
            return Ok(Vec::new());
        }

        let n = self.axis.len();
        let start = self.axis.lower_bound(filter.lo());
        let mut end = self.axis.lower_bound(filter.hi());
        if end < n && self.axis.value(end) == filter.hi() {
            end += 1;
        }
        if start >= end {
            return Ok(Vec::new());
        }

        let cover = self.tree.select(start, end);
        let offsets = self.tree.offsets(cover.level);
        let spec = BeamSpec {
            beam: params.beam(),
            cut: params.cut(),
            visit_limit: params.visit_limit(),
            degree_limit: params.degree_limit(),
        };

        // Per-bucket searches run sequentially: the benchmark protocol keeps
        // a query on one worker and parallelism lives across queries.
        let mut merged: Vec<Neighbour> = Vec::new();
        for bucket in cover.first..cover.last {
            let bucket_start = offsets[bucket];
            let points = self.store.range(bucket_start, offsets[bucket + 1]);
            let outcome = beam_search(&points, self.tree.graph(cover.level, bucket), query, &spec);
            // Each bucket contributes its whole beam: edge buckets lose
            // entries to the postfilter below, and qualifying points must be
            // able to back-fill the final k.
            merged.extend(outcome.nearest.into_iter().map(|local| Neighbour {
                id: bucket_start + local.id,
                distance: local.distance,
            }));
        }

        merged.sort_unstable();
        // Edge buckets may overhang the requested interval; sorted position
        // decides the attribute predicate exactly.
        if offsets[cover.first] < start || offsets[cover.last] > end {
            merged.retain(|neighbour| neighbour.id >= start && neighbour.id < end);
        }
        merged.truncate(k);

        let mut results: Vec<Neighbour> = merged
            .into_iter()
            .map(|neighbour| Neighbour {
                id: self.axis.map_out(neighbour.id),
                distance: neighbour.distance,
            })
            .collect();
        results.sort_unstable();
        Ok(results)
    }
}
