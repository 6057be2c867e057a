//! Query-throughput sweep over beam widths on a prebuilt index.
//!
//! The index is constructed once per corpus size outside the timing loop;
//! each benchmark measures single-threaded range-filtered queries at one
//! beam width, cycling through a deterministic query set.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use fenestra_benches::synthetic::{clustered_corpus, ClusteredCorpusConfig};
use fenestra_core::{CorpusSource, FenestraBuilder, GraphParams, RangeFilter, SearchParams};

const BENCH_SEED: u64 = 0xBE;
const POINT_COUNT: usize = 4_000;
const QUERY_COUNT: usize = 64;
const K: usize = 10;
const BEAM_WIDTHS: &[usize] = &[32, 64, 128];

fn beam_sweep(c: &mut Criterion) {
    let config = ClusteredCorpusConfig {
        point_count: POINT_COUNT,
        dimensions: 16,
        cluster_count: 16,
        separation: 10.0,
        spread: 1.0,
        attribute_span: 1_000.0,
    };
    let corpus = clustered_corpus(&config, BENCH_SEED).expect("corpus generation must succeed");
    let index = FenestraBuilder::new()
        .with_graph_params(GraphParams::new(32, 64, 1.2).expect("graph params must be valid"))
        .with_cutoff(500)
        .with_split_factor(2)
        .with_rng_seed(BENCH_SEED)
        .build(&corpus)
        .expect("index construction must succeed");

    let queries: Vec<Vec<f32>> = (0..QUERY_COUNT)
        .map(|probe| corpus.point(probe * POINT_COUNT / QUERY_COUNT).to_vec())
        .collect();
    let filter = RangeFilter::new(250.0, 750.0).expect("filter must be valid");

    let mut group = c.benchmark_group("beam_sweep");
    group.sample_size(20);
    for &beam in BEAM_WIDTHS {
        let params = SearchParams::new(beam).expect("beam width must be valid");
        group.bench_with_input(BenchmarkId::from_parameter(beam), &params, |b, params| {
            let mut cursor = 0_usize;
            b.iter(|| {
                let query = &queries[cursor];
                cursor = (cursor + 1) % queries.len();
                index
                    .search(query, &filter, K, params)
                    .expect("search must succeed")
            });
        });
    }
    group.finish();
}

criterion_group!(benches, beam_sweep);
criterion_main!(benches);
