//! Seeded synthetic corpora: Gaussian clusters with uniform attributes.

use fenestra_core::DenseCorpus;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::f32::consts::PI;
use thiserror::Error;

/// Errors raised while validating a synthetic corpus configuration.
#[derive(Debug, Error, PartialEq)]
pub enum SyntheticError {
    /// At least one point is required.
    #[error("point_count must be greater than zero")]
    ZeroPoints,
    /// Points need a positive dimension.
    #[error("dimensions must be greater than zero")]
    ZeroDimensions,
    /// At least one cluster is required.
    #[error("cluster_count must be greater than zero")]
    ZeroClusters,
    /// More clusters than points cannot be populated.
    #[error("cluster_count ({cluster_count}) exceeds point_count ({point_count})")]
    ClusterCountExceedsPointCount {
        cluster_count: usize,
        point_count: usize,
    },
    /// A float parameter was non-finite or non-positive.
    #[error("parameter `{parameter}` must be a positive finite value")]
    InvalidFloatParameter { parameter: &'static str },
}

/// Configuration for a Gaussian-cluster corpus.
#[derive(Clone, Debug)]
pub struct ClusteredCorpusConfig {
    /// Number of points to generate.
    pub point_count: usize,
    /// Dimension of every point.
    pub dimensions: usize,
    /// Number of Gaussian blobs.
    pub cluster_count: usize,
    /// Distance scale separating blob centroids.
    pub separation: f32,
    /// Standard deviation of the noise around each centroid.
    pub spread: f32,
    /// Attributes are drawn uniformly from `[0, attribute_span)`.
    pub attribute_span: f32,
}

impl Default for ClusteredCorpusConfig {
    fn default() -> Self {
        Self {
            point_count: 1_000,
            dimensions: 8,
            cluster_count: 10,
            separation: 10.0,
            spread: 1.0,
            attribute_span: 1_000.0,
        }
    }
}

/// Generates a clustered corpus deterministically from `seed`.
///
/// Centroids sit on a circle in the first two dimensions (with small random
/// offsets elsewhere); points cycle through clusters and add Gaussian noise.
///
/// # Errors
/// Returns [`SyntheticError`] when the configuration is inconsistent.
///
/// # Examples
/// ```
/// use fenestra_benches::synthetic::{clustered_corpus, ClusteredCorpusConfig};
/// use fenestra_core::CorpusSource;
///
/// let corpus = clustered_corpus(&ClusteredCorpusConfig::default(), 7)?;
/// assert_eq!(corpus.len(), 1_000);
/// assert_eq!(corpus.dim(), 8);
/// # Ok::<(), fenestra_benches::synthetic::SyntheticError>(())
/// ```
pub fn clustered_corpus(
    config: &ClusteredCorpusConfig,
    seed: u64,
) -> Result<DenseCorpus, SyntheticError> {
    validate_config(config)?;
    let mut rng = SmallRng::seed_from_u64(seed);
    let centroids = build_centroids(config, &mut rng);

    let mut values = Vec::with_capacity(config.point_count * config.dimensions);
    for point in 0..config.point_count {
        let centroid = &centroids[point % config.cluster_count];
        for &centre in centroid {
            values.push(centre + standard_normal_sample(&mut rng) * config.spread);
        }
    }
    let attributes: Vec<f32> = (0..config.point_count)
        .map(|_| rng.gen_range(0.0..config.attribute_span))
        .collect();

    Ok(
        DenseCorpus::new("synthetic-clusters", values, config.dimensions, attributes)
            .expect("generated corpus is always well-formed"),
    )
}

fn validate_config(config: &ClusteredCorpusConfig) -> Result<(), SyntheticError> {
    if config.point_count == 0 {
        return Err(SyntheticError::ZeroPoints);
    }
    if config.dimensions == 0 {
        return Err(SyntheticError::ZeroDimensions);
    }
    if config.cluster_count == 0 {
        return Err(SyntheticError::ZeroClusters);
    }
    if config.cluster_count > config.point_count {
        return Err(SyntheticError::ClusterCountExceedsPointCount {
            cluster_count: config.cluster_count,
            point_count: config.point_count,
        });
    }
    for (parameter, value) in [
        ("separation", config.separation),
        ("spread", config.spread),
        ("attribute_span", config.attribute_span),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(SyntheticError::InvalidFloatParameter { parameter });
        }
    }
    Ok(())
}

fn build_centroids(config: &ClusteredCorpusConfig, rng: &mut SmallRng) -> Vec<Vec<f32>> {
    (0..config.cluster_count)
        .map(|cluster_index| {
            let angle = (cluster_index as f32 / config.cluster_count as f32) * (2.0 * PI);
            let mut centroid = vec![0.0_f32; config.dimensions];
            if let Some(value) = centroid.get_mut(0) {
                *value = config.separation * angle.cos();
            }
            if let Some(value) = centroid.get_mut(1) {
                *value = config.separation * angle.sin();
            }
            for value in centroid.iter_mut().skip(2) {
                *value = rng.gen_range((-0.2 * config.separation)..(0.2 * config.separation));
            }
            centroid
        })
        .collect()
}

/// Box-Muller draw from the standard normal distribution.
fn standard_normal_sample(rng: &mut SmallRng) -> f32 {
    let mut u1 = rng.gen_range(0.0_f32..1.0_f32);
    if u1 == 0.0 {
        u1 = f32::MIN_POSITIVE;
    }
    let u2 = rng.gen_range(0.0_f32..1.0_f32);
    let radius = (-2.0_f32 * u1.ln()).sqrt();
    let theta = 2.0 * PI * u2;
    radius * theta.cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fenestra_core::CorpusSource;

    #[test]
    fn generation_is_deterministic_per_seed() {
        let config = ClusteredCorpusConfig {
            point_count: 100,
            ..ClusteredCorpusConfig::default()
        };
        let first = clustered_corpus(&config, 3).expect("generation must succeed");
        let second = clustered_corpus(&config, 3).expect("generation must succeed");
        assert_eq!(first.point(42), second.point(42));
        assert_eq!(first.attributes(), second.attributes());

        let other = clustered_corpus(&config, 4).expect("generation must succeed");
        assert_ne!(first.point(42), other.point(42));
    }

    #[test]
    fn attributes_stay_in_the_configured_span() {
        let config = ClusteredCorpusConfig {
            point_count: 200,
            attribute_span: 50.0,
            ..ClusteredCorpusConfig::default()
        };
        let corpus = clustered_corpus(&config, 9).expect("generation must succeed");
        assert!(corpus
            .attributes()
            .iter()
            .all(|&attr| (0.0..50.0).contains(&attr)));
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        let mut config = ClusteredCorpusConfig::default();
        config.cluster_count = config.point_count + 1;
        let err = clustered_corpus(&config, 0).expect_err("oversubscribed clusters must fail");
        assert_eq!(
            err,
            SyntheticError::ClusterCountExceedsPointCount {
                cluster_count: config.cluster_count,
                point_count: config.point_count,
            }
        );

        let config = ClusteredCorpusConfig {
            spread: -1.0,
            ..ClusteredCorpusConfig::default()
        };
        let err = clustered_corpus(&config, 0).expect_err("negative spread must fail");
        assert_eq!(
            err,
            SyntheticError::InvalidFloatParameter { parameter: "spread" }
        );
    }
}
