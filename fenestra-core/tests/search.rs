//! End-to-end search behaviour over built indexes.

use fenestra_core::{
    DenseCorpus, FenestraBuilder, FenestraError, GraphParams, Neighbour, RangeFilter, SearchParams,
    squared_euclidean,
};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Corpus whose points sit on the diagonal `(i, i)` with attribute `i`, so
/// distance order and attribute order coincide and expectations are exact.
fn diagonal_corpus(n: usize) -> DenseCorpus {
    let values: Vec<f32> = (0..n).flat_map(|i| [i as f32, i as f32]).collect();
    let attributes: Vec<f32> = (0..n).map(|i| i as f32).collect();
    DenseCorpus::new("diagonal", values, 2, attributes).expect("corpus must validate")
}

fn diagonal_index(n: usize, cutoff: usize, split_factor: usize) -> fenestra_core::Fenestra {
    FenestraBuilder::new()
        .with_graph_params(GraphParams::new(8, 16, 1.2).expect("params"))
        .with_cutoff(cutoff)
        .with_split_factor(split_factor)
        .with_rng_seed(7)
        .build(&diagonal_corpus(n))
        .expect("build must succeed")
}

fn brute_force(corpus_values: &[Vec<f32>], query: &[f32]) -> Vec<Neighbour> {
    let mut all: Vec<Neighbour> = corpus_values
        .iter()
        .enumerate()
        .map(|(id, point)| Neighbour {
            id,
            distance: squared_euclidean(point, query),
        })
        .collect();
    all.sort_unstable();
    all
}

#[test]
fn tiny_index_matches_brute_force_exactly() {
    // A single bucket whose graph covers everything: beam search over the
    // open range must return the full corpus in brute-force order.
    let mut rng = SmallRng::seed_from_u64(2024);
    let points: Vec<Vec<f32>> = (0..16)
        .map(|_| (0..4).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect();
    let values: Vec<f32> = points.iter().flatten().copied().collect();
    let attributes: Vec<f32> = (0..16).map(|i| i as f32).collect();
    let corpus = DenseCorpus::new("tiny", values, 4, attributes).expect("corpus must validate");

    let index = FenestraBuilder::new()
        .with_graph_params(GraphParams::new(8, 16, 1.2).expect("params"))
        .with_cutoff(16)
        .with_split_factor(2)
        .with_rng_seed(1)
        .build(&corpus)
        .expect("build must succeed");
    assert_eq!(index.level_count(), 1);

    let query: Vec<f32> = (0..4).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let open = RangeFilter::new(f32::NEG_INFINITY, f32::INFINITY).expect("open range");
    let hits = index
        .search(&query, &open, 16, &SearchParams::new(16).expect("beam"))
        .expect("search must succeed");

    assert_eq!(hits, brute_force(&points, &query));
}

#[test]
fn single_bucket_range_returns_only_qualifying_ids() {
    // [64, 127] is exactly one leaf bucket of the 1024-point index.
    let index = diagonal_index(1024, 64, 4);
    let filter = RangeFilter::new(64.0, 127.0).expect("filter");
    let hits = index
        .search(&[90.0, 90.0], &filter, 10, &SearchParams::new(32).expect("beam"))
        .expect("search must succeed");

    assert!(!hits.is_empty());
    for neighbour in &hits {
        let attr = neighbour.id as f32;
        assert!((64.0..=127.0).contains(&attr), "id {} out of range", neighbour.id);
    }
    assert_eq!(hits[0].id, 90);
}

#[test]
fn sibling_spanning_range_stays_inside_the_interval() {
    let index = diagonal_index(1024, 64, 4);
    let filter = RangeFilter::new(60.0, 140.0).expect("filter");
    let hits = index
        .search(&[100.0, 100.0], &filter, 10, &SearchParams::new(32).expect("beam"))
        .expect("search must succeed");

    assert_eq!(hits.len(), 10);
    for neighbour in &hits {
        let attr = neighbour.id as f32;
        assert!((60.0..=140.0).contains(&attr));
    }
    assert_eq!(hits[0].id, 100);
}

#[test]
fn disjoint_range_yields_empty_results() {
    let index = diagonal_index(256, 32, 2);
    let filter = RangeFilter::new(-5.0, -1.0).expect("filter");
    let hits = index
        .search(&[10.0, 10.0], &filter, 5, &SearchParams::new(16).expect("beam"))
        .expect("search must succeed");
    assert!(hits.is_empty());

    let above = RangeFilter::new(10_000.0, 20_000.0).expect("filter");
    let hits = index
        .search(&[10.0, 10.0], &above, 5, &SearchParams::new(16).expect("beam"))
        .expect("search must succeed");
    assert!(hits.is_empty());
}

#[test]
fn mid_bucket_range_never_leaks_across_the_boundary() {
    // [10, 40] ends mid-bucket; the query point sits outside the interval so
    // the nearest unfiltered neighbours would all be violations.
    let index = diagonal_index(1024, 64, 4);
    let filter = RangeFilter::new(10.0, 40.0).expect("filter");
    let hits = index
        .search(&[50.0, 50.0], &filter, 5, &SearchParams::new(32).expect("beam"))
        .expect("search must succeed");

    assert!(!hits.is_empty());
    for neighbour in &hits {
        let attr = neighbour.id as f32;
        assert!((10.0..=40.0).contains(&attr), "id {} crossed the boundary", neighbour.id);
    }
    assert_eq!(hits[0].id, 40);
}

#[test]
fn narrow_range_returns_all_qualifying_points() {
    let index = diagonal_index(1024, 64, 4);
    let filter = RangeFilter::new(100.0, 102.0).expect("filter");
    let hits = index
        .search(&[101.0, 101.0], &filter, 10, &SearchParams::new(32).expect("beam"))
        .expect("search must succeed");

    let ids: Vec<usize> = hits.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![101, 100, 102]);
}

#[test]
fn results_are_sorted_by_distance_then_id() {
    let index = diagonal_index(512, 32, 2);
    let filter = RangeFilter::new(0.0, 511.0).expect("filter");
    let hits = index
        .search(&[200.5, 200.5], &filter, 8, &SearchParams::new(64).expect("beam"))
        .expect("search must succeed");

    assert!(hits.windows(2).all(|pair| {
        pair[0].distance < pair[1].distance
            || (pair[0].distance == pair[1].distance && pair[0].id < pair[1].id)
    }));
}

#[test]
fn query_dimension_mismatch_is_fatal() {
    let index = diagonal_index(64, 16, 2);
    let filter = RangeFilter::new(0.0, 63.0).expect("filter");
    let err = index
        .search(&[1.0, 2.0, 3.0], &filter, 5, &SearchParams::new(16).expect("beam"))
        .expect_err("mismatched dimension must fail");
    assert_eq!(
        err,
        FenestraError::DimensionMismatch {
            expected: 2,
            got: 3,
        }
    );
}

#[test]
fn zero_k_returns_nothing() {
    let index = diagonal_index(64, 16, 2);
    let filter = RangeFilter::new(0.0, 63.0).expect("filter");
    let hits = index
        .search(&[5.0, 5.0], &filter, 0, &SearchParams::new(16).expect("beam"))
        .expect("search must succeed");
    assert!(hits.is_empty());
}

#[test]
fn identical_seeds_produce_identical_answers() {
    let build = || {
        let mut rng = SmallRng::seed_from_u64(5);
        let values: Vec<f32> = (0..128 * 3).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let attributes: Vec<f32> = (0..128).map(|_| rng.gen_range(0.0..100.0)).collect();
        let corpus = DenseCorpus::new("seeded", values, 3, attributes).expect("corpus");
        FenestraBuilder::new()
            .with_graph_params(GraphParams::new(6, 12, 1.2).expect("params"))
            .with_cutoff(16)
            .with_rng_seed(123)
            .build(&corpus)
            .expect("build must succeed")
    };
    let first = build();
    let second = build();
    assert_eq!(first.decode(), second.decode());

    let filter = RangeFilter::new(20.0, 80.0).expect("filter");
    let params = SearchParams::new(24).expect("beam");
    for probe in 0..8 {
        let query = [probe as f32 * 0.1, 0.5, -0.25];
        let lhs = first.search(&query, &filter, 10, &params).expect("search");
        let rhs = second.search(&query, &filter, 10, &params).expect("search");
        assert_eq!(lhs, rhs);
    }
}

#[test]
fn range_endpoints_are_inclusive() {
    let index = diagonal_index(128, 16, 2);
    let filter = RangeFilter::new(30.0, 33.0).expect("filter");
    let hits = index
        .search(&[30.0, 30.0], &filter, 10, &SearchParams::new(32).expect("beam"))
        .expect("search must succeed");
    let mut ids: Vec<usize> = hits.iter().map(|n| n.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![30, 31, 32, 33]);
}
