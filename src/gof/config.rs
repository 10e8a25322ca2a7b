use serde::{Deserialize, Serialize};

use crate::statistics::z_score;

/// Settings of one Monte Carlo goodness-of-fit run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    /// Number of simulate-and-refit iterations.
    pub n_iterations: usize,
    /// Skip failed fits instead of aborting the run.
    pub continue_on_failure: bool,
    /// Seed for reproducibility (None = random, logged at start).
    pub seed: Option<u64>,
    /// Run iterations on the rayon pool (`rayon` feature).
    pub parallel: bool,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            n_iterations: 1000,
            continue_on_failure: false,
            seed: None,
            parallel: false,
        }
    }
}

impl MonteCarloConfig {
    /// Number of iterations that keeps the Monte Carlo error of the p-value
    /// below `accuracy`.
    ///
    /// Uses the worst case of a binomial proportion (`p = 0.5`):
    /// ```text
    /// n_iterations = ceil( z²_{1−α/2} · 0.25 / accuracy² )
    /// ```
    /// clamped to `[100, 10_000_000]`.
    ///
    /// | accuracy | iterations (95%) |
    /// |----------|------------------|
    /// | 0.05     | 385              |
    /// | 0.01     | 9 604            |
    /// | 0.005    | 38 415           |
    ///
    /// # Panics
    /// Panics if `accuracy ∉ (0, 0.5)` or `confidence ∉ (0.5, 1.0)`.
    pub fn for_accuracy(accuracy: f64, confidence: f64) -> Self {
        assert!(
            accuracy > 0.0 && accuracy < 0.5,
            "accuracy must be in (0, 0.5), got {accuracy}"
        );
        assert!(
            confidence > 0.5 && confidence < 1.0,
            "confidence must be in (0.5, 1.0), got {confidence}"
        );

        let z = z_score(confidence);
        let n_min = (z * z * 0.25) / (accuracy * accuracy);

        Self {
            n_iterations: (n_min.ceil() as usize).clamp(100, 10_000_000),
            ..Self::default()
        }
    }

    /// Fluent builder: number of iterations.
    #[must_use]
    pub fn iterations(mut self, n_iterations: usize) -> Self {
        self.n_iterations = n_iterations;
        self
    }

    /// Fluent builder: skip failed fits instead of aborting.
    #[must_use]
    pub fn continue_on_failure(mut self, continue_on_failure: bool) -> Self {
        self.continue_on_failure = continue_on_failure;
        self
    }

    /// Fluent builder: fix the seed.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fluent builder: run iterations on the rayon pool.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
