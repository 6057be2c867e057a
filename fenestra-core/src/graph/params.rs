//! Parameter handling for graph construction and beam search.

use crate::error::FenestraError;

const DEFAULT_PASSES: usize = 2;
const DEFAULT_CUT: f32 = 1.35;
const DEFAULT_VISIT_LIMIT: usize = 10_000_000;
const DEFAULT_DEGREE_LIMIT: usize = 10_000;

/// Configuration for building a bucket's proximity graph.
///
/// `degree` bounds every node's out-degree (`R`), `build_beam` is the beam
/// width used while wiring nodes (`L`), and `alpha` is the pruning slack
/// applied on the final pass.
///
/// # Examples
/// ```
/// use fenestra_core::GraphParams;
///
/// let params = GraphParams::new(32, 64, 1.2)?;
/// assert_eq!(params.degree(), 32);
/// assert_eq!(params.passes(), 2);
/// # Ok::<(), fenestra_core::FenestraError>(())
/// ```
#[derive(Clone, Debug)]
pub struct GraphParams {
    degree: usize,
    build_beam: usize,
    alpha: f32,
    passes: usize,
}

impl GraphParams {
    /// Creates a parameter set with explicit degree, beam width, and slack.
    ///
    /// # Errors
    /// Returns [`FenestraError::InvalidParameters`] when `degree` is zero,
    /// `build_beam` is smaller than `degree`, or `alpha` is below `1.0` or
    /// not finite.
    pub fn new(degree: usize, build_beam: usize, alpha: f32) -> Result<Self, FenestraError> {
        if degree == 0 {
            return Err(FenestraError::InvalidParameters {
                reason: "graph degree must be greater than zero".into(),
            });
        }
        if build_beam < degree {
            return Err(FenestraError::InvalidParameters {
                reason: format!("build beam ({build_beam}) must be >= degree ({degree})"),
            });
        }
        if !alpha.is_finite() || alpha < 1.0 {
            return Err(FenestraError::InvalidParameters {
                reason: format!("alpha must be a finite value >= 1.0 (got {alpha})"),
            });
        }
        Ok(Self {
            degree,
            build_beam,
            alpha,
            passes: DEFAULT_PASSES,
        })
    }

    /// Overrides the number of wiring passes; values below one are clamped.
    ///
    /// Earlier passes prune with slack `1.0`; only the final pass applies the
    /// configured `alpha`.
    #[must_use]
    pub fn with_passes(mut self, passes: usize) -> Self {
        self.passes = passes.max(1);
        self
    }

    /// Returns the out-degree bound (`R`).
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Returns the construction beam width (`L`).
    #[must_use]
    pub fn build_beam(&self) -> usize {
        self.build_beam
    }

    /// Returns the pruning slack applied on the final pass.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Returns the number of wiring passes.
    #[must_use]
    pub fn passes(&self) -> usize {
        self.passes
    }
}

impl Default for GraphParams {
    fn default() -> Self {
        Self::new(32, 64, 1.2).expect("default parameters must be valid")
    }
}

/// Beam-search knobs for a single query.
///
/// Defaults for `cut`, the visit limit, and the per-node degree limit follow
/// the benchmark driver's canonical values.
///
/// # Examples
/// ```
/// use fenestra_core::SearchParams;
///
/// let params = SearchParams::new(100)?.with_cut(1.5);
/// assert_eq!(params.beam(), 100);
/// assert_eq!(params.cut(), 1.5);
/// # Ok::<(), fenestra_core::FenestraError>(())
/// ```
#[derive(Clone, Debug)]
pub struct SearchParams {
    beam: usize,
    cut: f32,
    visit_limit: usize,
    degree_limit: usize,
}

impl SearchParams {
    /// Creates search parameters with the given beam width.
    ///
    /// # Errors
    /// Returns [`FenestraError::InvalidParameters`] when `beam` is zero.
    pub fn new(beam: usize) -> Result<Self, FenestraError> {
        if beam == 0 {
            return Err(FenestraError::InvalidParameters {
                reason: "search beam must be greater than zero".into(),
            });
        }
        Ok(Self {
            beam,
            cut: DEFAULT_CUT,
            visit_limit: DEFAULT_VISIT_LIMIT,
            degree_limit: DEFAULT_DEGREE_LIMIT,
        })
    }

    /// Overrides the candidate-admission ratio; values below `1.0` are
    /// clamped to `1.0`.
    #[must_use]
    pub fn with_cut(mut self, cut: f32) -> Self {
        self.cut = if cut.is_finite() { cut.max(1.0) } else { DEFAULT_CUT };
        self
    }

    /// Caps the number of nodes a single search may visit.
    #[must_use]
    pub fn with_visit_limit(mut self, limit: usize) -> Self {
        self.visit_limit = limit.max(1);
        self
    }

    /// Caps the number of edges expanded per visited node.
    #[must_use]
    pub fn with_degree_limit(mut self, limit: usize) -> Self {
        self.degree_limit = limit.max(1);
        self
    }

    /// Returns the beam width.
    #[must_use]
    pub fn beam(&self) -> usize {
        self.beam
    }

    /// Returns the candidate-admission ratio.
    #[must_use]
    pub fn cut(&self) -> f32 {
        self.cut
    }

    /// Returns the visited-node cap.
    #[must_use]
    pub fn visit_limit(&self) -> usize {
        self.visit_limit
    }

    /// Returns the per-node edge-expansion cap.
    #[must_use]
    pub fn degree_limit(&self) -> usize {
        self.degree_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zero_degree(0, 16, 1.2)]
    #[case::beam_below_degree(16, 8, 1.2)]
    #[case::alpha_below_one(16, 32, 0.9)]
    #[case::alpha_nan(16, 32, f32::NAN)]
    fn graph_params_reject_invalid_values(
        #[case] degree: usize,
        #[case] beam: usize,
        #[case] alpha: f32,
    ) {
        let err = GraphParams::new(degree, beam, alpha).expect_err("parameters must be rejected");
        assert!(matches!(err, FenestraError::InvalidParameters { .. }));
    }

    #[test]
    fn passes_clamp_to_at_least_one() {
        let params = GraphParams::default().with_passes(0);
        assert_eq!(params.passes(), 1);
    }

    #[test]
    fn search_params_reject_zero_beam() {
        let err = SearchParams::new(0).expect_err("zero beam must be rejected");
        assert!(matches!(err, FenestraError::InvalidParameters { .. }));
    }

    #[test]
    fn cut_clamps_to_admission_floor() {
        let params = SearchParams::new(8).expect("beam must be valid").with_cut(0.5);
        assert_eq!(params.cut(), 1.0);
    }
}
