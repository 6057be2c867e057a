//! Brute-force range oracle and recall scoring.
//!
//! The oracle scans the whole corpus, applies the attribute predicate, and
//! keeps the exact top-k; recall is reported as integer hits over a target
//! count and converted to a fraction only at display boundaries.

use std::collections::{BinaryHeap, HashSet};

use fenestra_core::{squared_euclidean, CorpusSource, DenseCorpus, Neighbour};

/// Integer-only recall score.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RecallScore {
    /// True neighbours the approximate search recovered.
    pub hits: usize,
    /// Target count (min of k, oracle length, observed length).
    pub total: usize,
}

impl RecallScore {
    /// Converts the score to a fraction; zero targets yield `0.0`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.hits as f64 / self.total as f64
    }
}

/// Computes the exact range-filtered top-k by exhaustive scan.
///
/// Returns up to `k` neighbours with attribute in `[lo, hi]`, sorted by
/// ascending distance with ties on the smaller id. Ids are original corpus
/// ids, matching what a [`fenestra_core::Fenestra`] search returns.
///
/// # Examples
/// ```
/// use fenestra_benches::oracle::brute_force_range_top_k;
/// use fenestra_core::DenseCorpus;
///
/// let corpus = DenseCorpus::new(
///     "demo",
///     vec![0.0, 1.0, 2.0, 3.0],
///     1,
///     vec![10.0, 20.0, 30.0, 40.0],
/// )?;
/// let oracle = brute_force_range_top_k(&corpus, &[2.1], 20.0, 40.0, 2);
/// assert_eq!(oracle[0].id, 2);
/// assert_eq!(oracle[1].id, 3);
/// # Ok::<(), fenestra_core::CorpusError>(())
/// ```
#[must_use]
pub fn brute_force_range_top_k(
    corpus: &DenseCorpus,
    query: &[f32],
    lo: f32,
    hi: f32,
    k: usize,
) -> Vec<Neighbour> {
    if k == 0 {
        return Vec::new();
    }
    let mut heap: BinaryHeap<Neighbour> = BinaryHeap::with_capacity(k + 1);
    for id in 0..corpus.len() {
        let attribute = corpus.attribute(id);
        if attribute < lo || attribute > hi {
            continue;
        }
        heap.push(Neighbour {
            id,
            distance: squared_euclidean(corpus.point(id), query),
        });
        if heap.len() > k {
            heap.pop();
        }
    }
    let mut neighbours = heap.into_vec();
    neighbours.sort_unstable();
    neighbours
}

/// Computes recall@k between an oracle and an observed neighbour list.
///
/// Both lists are truncated to `min(k, oracle.len(), observed.len())` before
/// the overlap is counted.
#[must_use]
pub fn recall_at_k(oracle: &[Neighbour], observed: &[Neighbour], k: usize) -> RecallScore {
    let target = k.min(oracle.len()).min(observed.len());
    if target == 0 {
        return RecallScore { hits: 0, total: 0 };
    }
    let oracle_ids: HashSet<usize> = oracle.iter().take(target).map(|n| n.id).collect();
    let hits = observed
        .iter()
        .take(target)
        .filter(|neighbour| oracle_ids.contains(&neighbour.id))
        .count();
    RecallScore { hits, total: target }
}
