//! The benchmark driver: build a range-filtered ANN index from dataset
//! files, sweep query beam widths, and report QPS and recall in the survey's
//! line protocol.
//!
//! Loading is not timed. Construction runs on a rayon pool sized by the
//! `threads` argument and is timed; queries run single-threaded, one sweep
//! per requested beam width.

use std::collections::HashSet;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use fenestra_core::{
    CorpusError, CorpusSource, DenseCorpus, Fenestra, FenestraBuilder, FenestraError, GraphParams,
    RangeFilter, SearchParams,
};
use fenestra_io::{
    read_attributes, read_ground_truth, read_ranges, read_vector_set, DatasetError, VectorSet,
};
use thiserror::Error;
use tracing::info;

use crate::telemetry::{peak_memory_lines, TelemetryError, ThreadCountSampler};

const SAMPLE_INTERVAL: Duration = Duration::from_millis(10);

/// Command-line surface: five dataset paths, five build parameters, and the
/// query workload description.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "fenestra",
    about = "Build a range-filtered ANN index and sweep query beam widths over a workload."
)]
pub struct Cli {
    /// Corpus vectors: u32 count, u32 dim, then count*dim little-endian f32.
    pub corpus: PathBuf,
    /// Corpus attributes, one float per line.
    pub attributes: PathBuf,
    /// Query vectors, same layout as the corpus.
    pub queries: PathBuf,
    /// Query attribute intervals, one `lo-hi` per line.
    pub ranges: PathBuf,
    /// Ground-truth neighbour ids in ivecs layout.
    pub ground_truth: PathBuf,
    /// Maximum graph out-degree (R).
    pub degree: usize,
    /// Construction beam width (L).
    pub build_beam: usize,
    /// Pruning slack (alpha).
    pub alpha: f32,
    /// Maximum leaf-bucket size.
    pub cutoff: usize,
    /// Children per bucket split.
    pub split_factor: usize,
    /// Neighbours to return per query.
    pub k: usize,
    /// Comma-separated query beam widths; surrounding brackets are allowed.
    pub beam_list: String,
    /// Worker threads for construction; 0 auto-detects.
    pub threads: usize,
}

/// Errors surfaced while executing the driver.
#[derive(Debug, Error)]
pub enum CliError {
    /// The beam-width list did not parse.
    #[error("invalid beam list `{raw}`: expected comma-separated positive integers")]
    BeamList { raw: String },
    /// The query file held no queries.
    #[error("query file contains no queries")]
    NoQueries,
    /// A dataset file failed to load.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// The corpus failed validation.
    #[error(transparent)]
    Corpus(#[from] CorpusError),
    /// Index construction or a query failed.
    #[error(transparent)]
    Core(#[from] FenestraError),
    /// Query vectors disagree with the corpus dimension.
    #[error("query dimension ({queries}) does not match corpus dimension ({corpus})")]
    QueryDimension { corpus: usize, queries: usize },
    /// Attribute lines disagree with the corpus size.
    #[error("corpus has {points} points but {attributes} attribute lines")]
    AttributeCount { points: usize, attributes: usize },
    /// Range lines disagree with the query count.
    #[error("got {queries} queries but {ranges} range lines")]
    RangeCount { queries: usize, ranges: usize },
    /// Ground-truth records disagree with the query count.
    #[error("got {queries} queries but {records} ground-truth records")]
    GroundTruthCount { queries: usize, records: usize },
    /// Process telemetry failed.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    /// The rayon pool could not be constructed.
    #[error("failed to build the worker pool: {source}")]
    ThreadPool {
        #[source]
        source: rayon::ThreadPoolBuildError,
    },
}

/// Outcome of one beam-width sweep over the whole query workload.
#[derive(Clone, Debug)]
pub struct SweepOutcome {
    /// Query beam width used for the sweep.
    pub beam: usize,
    /// Queries per second, single-threaded.
    pub qps: f64,
    /// Mean recall@k against the ground truth.
    pub recall: f64,
}

/// Everything the driver prints once the workload finishes.
#[derive(Clone, Debug)]
pub struct BenchReport {
    /// Raw `VmPeak:`/`VmHWM:` lines from `/proc/self/status`.
    pub memory_lines: Vec<String>,
    /// Peak workload threads during construction.
    pub build_threads: usize,
    /// Peak workload threads during query execution.
    pub query_threads: usize,
    /// Wall-clock construction time in seconds.
    pub build_seconds: f64,
    /// One entry per requested beam width, in request order.
    pub sweeps: Vec<SweepOutcome>,
}

/// Executes the benchmark described by `cli`.
///
/// # Errors
/// Returns [`CliError`] when a dataset fails to load, the input shapes
/// disagree, or construction or querying fails.
pub fn run_cli(cli: Cli) -> Result<BenchReport, CliError> {
    let beams = parse_beam_list(&cli.beam_list)?;
    let workload = load_workload(&cli)?;
    info!(
        points = workload.corpus.len(),
        dim = workload.queries.dim,
        queries = workload.queries.count,
        "workload loaded"
    );

    let builder = FenestraBuilder::new()
        .with_graph_params(GraphParams::new(cli.degree, cli.build_beam, cli.alpha)?)
        .with_cutoff(cli.cutoff)
        .with_split_factor(cli.split_factor);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads)
        .build()
        .map_err(|source| CliError::ThreadPool { source })?;

    let build_sampler = ThreadCountSampler::start(SAMPLE_INTERVAL)?;
    let build_started = Instant::now();
    let index = pool.install(|| builder.build(&workload.corpus))?;
    let build_seconds = build_started.elapsed().as_secs_f64();
    let build_threads = build_sampler.stop()?.saturating_sub(1);
    info!(seconds = build_seconds, "index constructed");

    let query_sampler = ThreadCountSampler::start(SAMPLE_INTERVAL)?;
    let mut sweeps = Vec::with_capacity(beams.len());
    for beam in beams {
        let sweep = run_sweep(&index, &workload, beam, cli.k)?;
        info!(beam, qps = sweep.qps, recall = sweep.recall, "sweep finished");
        sweeps.push(sweep);
    }
    let query_threads = query_sampler.stop()?.saturating_sub(1);

    Ok(BenchReport {
        memory_lines: peak_memory_lines()?,
        build_threads,
        query_threads,
        build_seconds,
        sweeps,
    })
}

struct Workload {
    corpus: DenseCorpus,
    queries: VectorSet,
    ranges: Vec<(f32, f32)>,
    ground_truth: Vec<Vec<u32>>,
}

fn load_workload(cli: &Cli) -> Result<Workload, CliError> {
    let corpus_set = read_vector_set(&cli.corpus)?;
    let attributes = read_attributes(&cli.attributes)?;
    if attributes.len() != corpus_set.count {
        return Err(CliError::AttributeCount {
            points: corpus_set.count,
            attributes: attributes.len(),
        });
    }

    let queries = read_vector_set(&cli.queries)?;
    if queries.count == 0 {
        return Err(CliError::NoQueries);
    }
    if queries.dim != corpus_set.dim {
        return Err(CliError::QueryDimension {
            corpus: corpus_set.dim,
            queries: queries.dim,
        });
    }

    let ranges = read_ranges(&cli.ranges)?;
    if ranges.len() != queries.count {
        return Err(CliError::RangeCount {
            queries: queries.count,
            ranges: ranges.len(),
        });
    }

    let mut ground_truth = read_ground_truth(&cli.ground_truth)?;
    if ground_truth.len() != queries.count {
        return Err(CliError::GroundTruthCount {
            queries: queries.count,
            records: ground_truth.len(),
        });
    }
    for record in &mut ground_truth {
        record.truncate(cli.k);
    }

    let name = cli
        .corpus
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("corpus")
        .to_owned();
    let dim = corpus_set.dim;
    let corpus = DenseCorpus::new(name, corpus_set.values, dim, attributes)?;

    Ok(Workload {
        corpus,
        queries,
        ranges,
        ground_truth,
    })
}

fn run_sweep(
    index: &Fenestra,
    workload: &Workload,
    beam: usize,
    k: usize,
) -> Result<SweepOutcome, CliError> {
    let params = SearchParams::new(beam)?;
    let mut results: Vec<Vec<u32>> = Vec::with_capacity(workload.queries.count);

    let started = Instant::now();
    for (query_id, &(lo, hi)) in workload.ranges.iter().enumerate() {
        let filter = RangeFilter::new(lo, hi)?;
        let neighbours = index.search(workload.queries.row(query_id), &filter, k, &params)?;
        results.push(neighbours.into_iter().map(|n| n.id as u32).collect());
    }
    let elapsed = started.elapsed().as_secs_f64();

    let qps = workload.queries.count as f64 / elapsed;
    let recall = mean_recall(&results, &workload.ground_truth, k);
    Ok(SweepOutcome { beam, qps, recall })
}

/// Fraction of the first `k` ground-truth ids each query recovered, averaged
/// with a fixed `queries * k` denominator so short result lists count
/// against recall.
fn mean_recall(results: &[Vec<u32>], ground_truth: &[Vec<u32>], k: usize) -> f64 {
    if k == 0 || results.is_empty() {
        return 0.0;
    }
    let mut correct = 0_usize;
    for (found, truth) in results.iter().zip(ground_truth) {
        let found: HashSet<u32> = found.iter().copied().collect();
        correct += truth
            .iter()
            .take(k)
            .filter(|id| found.contains(id))
            .count();
    }
    correct as f64 / (results.len() * k) as f64
}

fn parse_beam_list(raw: &str) -> Result<Vec<usize>, CliError> {
    let cleaned: String = raw
        .chars()
        .filter(|&c| c != '[' && c != ']')
        .collect();
    let mut beams = Vec::new();
    for token in cleaned.split(',') {
        let beam = token
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|&beam| beam > 0)
            .ok_or_else(|| CliError::BeamList {
                raw: raw.to_owned(),
            })?;
        beams.push(beam);
    }
    Ok(beams)
}

/// Renders `report` in the benchmark's stdout line protocol.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_report(report: &BenchReport, mut writer: impl Write) -> io::Result<()> {
    for line in &report.memory_lines {
        writeln!(writer, "{line}")?;
    }
    writeln!(
        writer,
        "Maximum number of threads during index construction: {}",
        report.build_threads
    )?;
    writeln!(
        writer,
        "Maximum number of threads during query execution: {}",
        report.query_threads
    )?;
    writeln!(writer, "Index construction time: {:.3} s", report.build_seconds)?;
    for sweep in &report.sweeps {
        writeln!(
            writer,
            "L_search: {} QPS: {:.3} Recall: {:.5}",
            sweep.beam, sweep.qps, sweep.recall
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("10,20,50", vec![10, 20, 50])]
    #[case::bracketed("[10,20,50]", vec![10, 20, 50])]
    #[case::spaced("10, 20 , 50", vec![10, 20, 50])]
    #[case::single("64", vec![64])]
    fn parse_beam_list_accepts_reference_shapes(#[case] raw: &str, #[case] expected: Vec<usize>) {
        assert_eq!(parse_beam_list(raw).expect("list must parse"), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::trailing_comma("10,20,")]
    #[case::word("fast")]
    #[case::zero("0")]
    fn parse_beam_list_rejects_malformed_input(#[case] raw: &str) {
        let err = parse_beam_list(raw).expect_err("malformed list must fail");
        assert!(matches!(err, CliError::BeamList { .. }));
    }

    #[test]
    fn mean_recall_counts_hits_against_a_fixed_denominator() {
        let results = vec![vec![0, 1, 2], vec![9, 8]];
        let truth = vec![vec![0, 1, 5], vec![7, 6, 5]];
        let recall = mean_recall(&results, &truth, 3);
        assert!((recall - 2.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn mean_recall_is_zero_for_empty_workloads() {
        assert_eq!(mean_recall(&[], &[], 10), 0.0);
        assert_eq!(mean_recall(&[vec![1]], &[vec![1]], 0), 0.0);
    }

    #[test]
    fn render_report_emits_the_line_protocol() {
        let report = BenchReport {
            memory_lines: vec!["VmPeak:\t  100 kB".into(), "VmHWM:\t   90 kB".into()],
            build_threads: 8,
            query_threads: 1,
            build_seconds: 1.234_567,
            sweeps: vec![SweepOutcome {
                beam: 32,
                qps: 1234.5678,
                recall: 0.9125,
            }],
        };
        let mut buffer = Vec::new();
        render_report(&report, &mut buffer).expect("render must succeed");
        let text = String::from_utf8(buffer).expect("output is UTF-8");
        assert!(text.starts_with("VmPeak:"));
        assert!(text.contains("Maximum number of threads during index construction: 8"));
        assert!(text.contains("Maximum number of threads during query execution: 1"));
        assert!(text.contains("Index construction time: 1.235 s"));
        assert!(text.contains("L_search: 32 QPS: 1234.568 Recall: 0.91250"));
    }
}
