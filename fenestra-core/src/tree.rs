//! The B-Window Search Tree: nested bucket partitions of the sorted axis,
//! one proximity graph per bucket.
//!
//! Level 0 is a single bucket over `[0, n)`. Each further level splits every
//! bucket of the previous one into `split_factor` children whose sizes differ
//! by at most one, stopping once no bucket exceeds `cutoff`. Bucket graphs on
//! a level are independent and built in parallel.

use rayon::prelude::*;

use crate::{
    graph::{build_graph, GraphParams, ProximityGraph},
    points::PointStore,
};

/// Mixes level and bucket indices into per-bucket RNG seeds so builds are
/// reproducible independent of worker count.
const LEVEL_SEED_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;
const BUCKET_SEED_SPACING: u64 = 0xD1B5_4A32_D192_ED03;

#[derive(Clone, Debug)]
struct TreeLevel {
    offsets: Vec<usize>,
    graphs: Vec<ProximityGraph>,
}

/// Which buckets of which level cover a sorted-id range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BucketCover {
    pub(crate) level: usize,
    /// First covering bucket.
    pub(crate) first: usize,
    /// One past the last covering bucket.
    pub(crate) last: usize,
}

#[derive(Clone, Debug)]
pub(crate) struct WindowTree {
    levels: Vec<TreeLevel>,
}

impl WindowTree {
    /// Partitions `[0, n)` and builds one graph per bucket on every level.
    pub(crate) fn build(
        store: &PointStore,
        params: &GraphParams,
        cutoff: usize,
        split_factor: usize,
        seed: u64,
    ) -> Self {
        debug_assert!(cutoff >= 1 && split_factor >= 2);
        let n = store.len();

        let mut level_offsets = vec![vec![0, n]];
        while max_bucket_size(level_offsets.last().expect("at least one level")) > cutoff {
            let parent = level_offsets.last().expect("at least one level");
            level_offsets.push(split_offsets(parent, split_factor));
        }

        let levels = level_offsets
            .into_iter()
            .enumerate()
            .map(|(level, offsets)| {
                let graphs = (0..offsets.len() - 1)
                    .into_par_iter()
                    .map(|bucket| {
                        let points = store.range(offsets[bucket], offsets[bucket + 1]);
                        build_graph(&points, params, bucket_seed(seed, level, bucket))
                    })
                    .collect();
                TreeLevel { offsets, graphs }
            })
            .collect();

        Self { levels }
    }

    pub(crate) fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub(crate) fn offsets(&self, level: usize) -> &[usize] {
        &self.levels[level].offsets
    }

    pub(crate) fn graph(&self, level: usize, bucket: usize) -> &ProximityGraph {
        &self.levels[level].graphs[bucket]
    }

    pub(crate) fn max_out_degree(&self) -> usize {
        self.levels
            .iter()
            .flat_map(|level| level.graphs.iter())
            .map(ProximityGraph::max_out_degree)
            .max()
            .unwrap_or(0)
    }

    /// Chooses the covering buckets for the sorted-id range `[start, end)`.
    ///
    /// Descends while the range collapses into a single bucket and answers
    /// the first level where it spans siblings; a range that stays collapsed
    /// all the way down gets the tightest (deepest) single bucket. Requires
    /// `start < end < n + 1`.
    pub(crate) fn select(&self, start: usize, end: usize) -> BucketCover {
        debug_assert!(start < end);
        let mut cover = BucketCover {
            level: 0,
            first: 0,
            last: 1,
        };
        for (level, tree_level) in self.levels.iter().enumerate() {
            let offsets = &tree_level.offsets;
            let first = offsets.partition_point(|&offset| offset <= start) - 1;
            let last = offsets.partition_point(|&offset| offset < end);
            cover = BucketCover { level, first, last };
            if last - first > 1 {
                break;
            }
        }
        cover
    }
}

fn max_bucket_size(offsets: &[usize]) -> usize {
    offsets
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .max()
        .unwrap_or(0)
}

/// Splits every parent bucket into `split_factor` children whose sizes differ
/// by at most one, larger children first.
fn split_offsets(parent: &[usize], split_factor: usize) -> Vec<usize> {
    let buckets = parent.len() - 1;
    let mut offsets = Vec::with_capacity(buckets * split_factor + 1);
    for pair in parent.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let size = end - start;
        if size == 0 {
            offsets.extend(std::iter::repeat(start).take(split_factor));
            continue;
        }
        let large = size.div_ceil(split_factor);
        let small = large - 1;
        let larger_buckets = size - small * split_factor;
        let mut cursor = start;
        for child in 0..split_factor {
            offsets.push(cursor);
            cursor += if child < larger_buckets { large } else { small };
        }
        debug_assert_eq!(cursor, end);
    }
    offsets.push(parent[parent.len() - 1]);
    offsets
}

fn bucket_seed(seed: u64, level: usize, bucket: usize) -> u64 {
    seed.wrapping_add((level as u64 + 1).wrapping_mul(LEVEL_SEED_SPACING))
        .wrapping_add((bucket as u64 + 1).wrapping_mul(BUCKET_SEED_SPACING))
}
