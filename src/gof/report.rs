use serde::{Deserialize, Serialize};

use crate::statistics::{Interval, proportion_interval};
use crate::table::{LikelihoodTable, ParameterTable, TOTAL_KEY};

/// Monte Carlo p-values of a fit, total first, then per dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodnessOfFitReport {
    /// Fraction of iterations whose total `-log(likelihood)` is `>=` the observed one
    pub total: f64,
    /// Same fraction per dataset, in dataset order
    pub datasets: Vec<(String, f64)>,
    /// Iterations requested; the denominator of every fraction
    pub n_requested: usize,
    /// Iterations whose fit succeeded
    pub n_successful: usize,
}

impl GoodnessOfFitReport {
    /// Fraction for dataset `name`
    pub fn dataset(&self, name: &str) -> Option<f64> {
        self.datasets
            .iter()
            .find(|(key, _)| key == name)
            .map(|&(_, p)| p)
    }

    /// `("total", p)` followed by `(dataset, p)` in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        std::iter::once((TOTAL_KEY, self.total))
            .chain(self.datasets.iter().map(|(name, p)| (name.as_str(), *p)))
    }

    /// Number of iterations skipped because their fit failed
    pub fn n_failed(&self) -> usize {
        self.n_requested - self.n_successful
    }

    /// Monte Carlo uncertainty of [`total`](Self::total) at `confidence`.
    pub fn total_interval(&self, confidence: f64) -> Interval<f64> {
        proportion_interval(self.total, self.n_requested, confidence)
    }

    /// Monte Carlo uncertainty of the fraction of dataset `name`.
    pub fn dataset_interval(&self, name: &str, confidence: f64) -> Option<Interval<f64>> {
        self.dataset(name)
            .map(|p| proportion_interval(p, self.n_requested, confidence))
    }
}

/// Everything a goodness-of-fit run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloOutcome {
    /// The p-values
    pub report: GoodnessOfFitReport,
    /// Best-fit parameters of every successful iteration
    pub parameters: ParameterTable,
    /// `-log(likelihood)` of every successful iteration
    pub likelihoods: LikelihoodTable,
}

impl MonteCarloOutcome {
    /// Split into `(report, parameters, likelihoods)`.
    pub fn into_parts(self) -> (GoodnessOfFitReport, ParameterTable, LikelihoodTable) {
        (self.report, self.parameters, self.likelihoods)
    }
}
