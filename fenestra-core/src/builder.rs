//! Builder for [`Fenestra`] indexes.
//!
//! Validates configuration, lays the corpus out in attribute-sorted order,
//! and constructs the window tree with its per-bucket graphs.

use std::sync::Arc;

use rayon::prelude::*;

use crate::{
    axis::AttributeAxis,
    error::{CorpusError, FenestraError},
    graph::GraphParams,
    index::Fenestra,
    points::PointStore,
    source::CorpusSource,
    tree::WindowTree,
    Result,
};

const DEFAULT_CUTOFF: usize = 1_000;
const DEFAULT_SPLIT_FACTOR: usize = 2;
const DEFAULT_RNG_SEED: u64 = 0xFE2E_57A1;

/// Configures and constructs [`Fenestra`] instances.
///
/// # Examples
/// ```
/// use fenestra_core::{DenseCorpus, FenestraBuilder, GraphParams};
///
/// let corpus = DenseCorpus::new(
///     "demo",
///     (0..32).map(|i| i as f32).collect(),
///     2,
///     (0..16).map(|i| i as f32).collect(),
/// )?;
/// let index = FenestraBuilder::new()
///     .with_graph_params(GraphParams::new(4, 8, 1.2)?)
///     .with_cutoff(4)
///     .with_split_factor(2)
///     .build(&corpus)?;
/// assert_eq!(index.len(), 16);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct FenestraBuilder {
    graph: GraphParams,
    cutoff: usize,
    split_factor: usize,
    rng_seed: u64,
}

impl Default for FenestraBuilder {
    fn default() -> Self {
        Self {
            graph: GraphParams::default(),
            cutoff: DEFAULT_CUTOFF,
            split_factor: DEFAULT_SPLIT_FACTOR,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

impl FenestraBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the proximity-graph construction parameters.
    #[must_use]
    pub fn with_graph_params(mut self, params: GraphParams) -> Self {
        self.graph = params;
        self
    }

    /// Overrides the maximum leaf-bucket size.
    #[must_use]
    pub fn with_cutoff(mut self, cutoff: usize) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Overrides the number of children per bucket split.
    #[must_use]
    pub fn with_split_factor(mut self, split_factor: usize) -> Self {
        self.split_factor = split_factor;
        self
    }

    /// Seeds the build so repeated runs produce identical indexes.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Returns the configured graph parameters.
    #[must_use]
    pub fn graph_params(&self) -> &GraphParams {
        &self.graph
    }

    /// Returns the configured leaf-bucket cutoff.
    #[must_use]
    pub fn cutoff(&self) -> usize {
        self.cutoff
    }

    /// Returns the configured split factor.
    #[must_use]
    pub fn split_factor(&self) -> usize {
        self.split_factor
    }

    /// Validates the configuration and builds an index over `source`.
    ///
    /// The corpus is sorted by attribute (stably, so equal attributes keep
    /// corpus order), rows are permuted into the sorted layout, and every
    /// bucket graph is constructed. Sorting, permutation, and sibling-bucket
    /// builds all run on the current rayon pool.
    ///
    /// # Errors
    /// Returns [`FenestraError::InvalidParameters`] for a zero cutoff or a
    /// split factor below two, [`FenestraError::EmptySource`] for an empty
    /// corpus, and [`FenestraError::Corpus`] when the source reports a zero
    /// dimension or a non-finite attribute.
    pub fn build<C: CorpusSource + Sync>(&self, source: &C) -> Result<Fenestra> {
        if self.cutoff == 0 {
            return Err(FenestraError::InvalidParameters {
                reason: "cutoff must be at least one".into(),
            });
        }
        if self.split_factor < 2 {
            return Err(FenestraError::InvalidParameters {
                reason: format!("split factor must be at least two (got {})", self.split_factor),
            });
        }

        let count = source.len();
        if count == 0 {
            return Err(FenestraError::EmptySource {
                data_source: Arc::from(source.name()),
            });
        }
        let dim = source.dim();
        if dim == 0 {
            return Err(FenestraError::Corpus {
                data_source: Arc::from(source.name()),
                error: CorpusError::ZeroDimension,
            });
        }

        let attributes: Vec<f32> = (0..count).map(|i| source.attribute(i)).collect();
        if let Some(index) = attributes.iter().position(|value| !value.is_finite()) {
            return Err(FenestraError::Corpus {
                data_source: Arc::from(source.name()),
                error: CorpusError::NonFiniteAttribute {
                    index,
                    value: attributes[index],
                },
            });
        }

        // Stable sort: equal attributes keep their corpus order, which pins
        // down decode[] for reproducible builds.
        let mut order: Vec<usize> = (0..count).collect();
        order.par_sort_by(|&left, &right| attributes[left].total_cmp(&attributes[right]));

        let mut values = vec![0.0_f32; count * dim];
        values
            .par_chunks_mut(dim)
            .enumerate()
            .for_each(|(sorted_id, row)| row.copy_from_slice(source.point(order[sorted_id])));

        let sorted_attributes: Vec<f32> = order.par_iter().map(|&oid| attributes[oid]).collect();

        let store = PointStore::new(values, count, dim);
        let tree = WindowTree::build(
            &store,
            &self.graph,
            self.cutoff,
            self.split_factor,
            self.rng_seed,
        );
        let axis = AttributeAxis::new(sorted_attributes, order);

        Ok(Fenestra::new(store, axis, tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DenseCorpus;
    use rstest::rstest;

    fn corpus(n: usize) -> DenseCorpus {
        // Attributes descend so the sort has real work to do.
        let values: Vec<f32> = (0..n * 2).map(|i| i as f32).collect();
        let attributes: Vec<f32> = (0..n).map(|i| (n - i) as f32).collect();
        DenseCorpus::new("test", values, 2, attributes).expect("corpus must validate")
    }

    #[rstest]
    #[case::zero_cutoff(0, 2)]
    #[case::unit_split(8, 1)]
    fn build_rejects_bad_tree_parameters(#[case] cutoff: usize, #[case] split_factor: usize) {
        let err = FenestraBuilder::new()
            .with_cutoff(cutoff)
            .with_split_factor(split_factor)
            .build(&corpus(8))
            .expect_err("invalid tree parameters must fail");
        assert!(matches!(err, FenestraError::InvalidParameters { .. }));
    }

    #[test]
    fn build_sorts_attributes_and_keeps_a_permutation() {
        let index = FenestraBuilder::new()
            .with_graph_params(GraphParams::new(4, 8, 1.2).expect("params"))
            .with_cutoff(4)
            .build(&corpus(12))
            .expect("build must succeed");

        let sorted = index.sorted_attributes();
        assert!(sorted.windows(2).all(|pair| pair[0] <= pair[1]));

        let mut seen = vec![false; 12];
        for &oid in index.decode() {
            assert!(!seen[oid], "decode must be a permutation");
            seen[oid] = true;
        }
        assert!(seen.iter().all(|&hit| hit));

        // Descending input attributes reverse under the sort.
        assert_eq!(index.decode()[0], 11);
    }

    #[test]
    fn build_is_deterministic_for_a_fixed_seed() {
        let build = || {
            FenestraBuilder::new()
                .with_graph_params(GraphParams::new(4, 8, 1.2).expect("params"))
                .with_cutoff(4)
                .with_rng_seed(17)
                .build(&corpus(32))
                .expect("build must succeed")
        };
        let first = build();
        let second = build();
        assert_eq!(first.decode(), second.decode());
        assert_eq!(first.sorted_attributes(), second.sorted_attributes());
    }
}
