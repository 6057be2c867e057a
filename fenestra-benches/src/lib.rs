//! Benchmark support crate for fenestra.
//!
//! Provides seeded synthetic corpora, a brute-force range oracle, and recall
//! scoring used by Criterion benchmarks and the recall-floor scenario test.

pub mod oracle;
pub mod synthetic;
