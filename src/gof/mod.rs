//! Goodness of fit of an already optimized model by parametric bootstrap.
//!
//! Synthetic datasets are simulated under the best-fit model, the model is
//! refitted to each of them and the resulting `-log(likelihood)` values are
//! compared with the one observed on the real data. The fraction of
//! simulations that fit at least as badly as the real data is the Monte
//! Carlo p-value of the fit.

mod config;
mod report;

use rand::RngCore;
use tracing::info;

pub use config::MonteCarloConfig;
pub use report::{GoodnessOfFitReport, MonteCarloOutcome};

use crate::data::{DataList, simulated_name};
use crate::error::Result;
use crate::fit_set::FitSet;
use crate::model::{FittedModel, Fitter, Minimizer};
use crate::resample::ParametricBootstrap;
use crate::statistics::{Exceedance, Statistic};
use crate::table::{LikelihoodTable, NegLogLikelihood};

/// Label of the iteration index in the result tables.
pub const ITERATION_NAME: &str = "simulation";

/// Monte Carlo goodness-of-fit driver for one completed fit.
///
/// Construction snapshots everything the runs need from the fitted model
/// (best-fit model, data, minimizer, fitter) together with the observed
/// `-log(likelihood)`. Runs never touch the fitted model again and never
/// change the reference values.
pub struct GoodnessOfFit<H: FittedModel> {
    best_fit: H::Model,
    data: DataList<H::Data>,
    minimizer: Minimizer,
    fitter: H::Fitter,
    reference: NegLogLikelihood,
}

impl<H> GoodnessOfFit<H>
where
    H: FittedModel,
    H::Model: Send + Sync,
    H::Data: Send + Sync,
{
    /// Capture the best-fit state of `fitted` and the observed statistics.
    ///
    /// `reference` holds the `-log(likelihood)` of the completed fit: the
    /// total and one value per dataset of `fitted.data_list()`.
    pub fn new(fitted: &H, reference: NegLogLikelihood) -> Self {
        Self {
            best_fit: fitted.best_fit(),
            data: fitted.data_list().clone(),
            minimizer: fitted.minimizer_in_use(),
            fitter: fitted.fitter(),
            reference,
        }
    }

    /// Observed statistics every run compares against
    pub fn reference(&self) -> &NegLogLikelihood {
        &self.reference
    }

    /// Best-fit model every iteration starts from
    pub fn best_fit(&self) -> &H::Model {
        &self.best_fit
    }

    /// Shorthand for [`run`](Self::run) with the remaining settings at their
    /// defaults (random seed, sequential).
    ///
    /// # Errors
    /// See [`run`](Self::run).
    pub fn by_mc(&self, n_iterations: usize, continue_on_failure: bool) -> Result<MonteCarloOutcome> {
        self.run(
            &MonteCarloConfig::default()
                .iterations(n_iterations)
                .continue_on_failure(continue_on_failure),
        )
    }

    /// Simulate, refit and compare `config.n_iterations` times.
    ///
    /// Every iteration simulates each dataset as `<name>_sim`, refits a fresh
    /// copy of the best-fit model with the original minimizer and records
    /// its `-log(likelihood)`. The reported fraction for a key is the number
    /// of iterations whose value is `>=` the reference, divided by the number
    /// of *requested* iterations, so skipped fits count as non-exceeding.
    ///
    /// # Errors
    /// - [`Error::NoIterations`](crate::Error::NoIterations) for zero iterations
    /// - [`Error::Simulation`](crate::Error::Simulation) if a dataset cannot be simulated
    /// - [`Error::Fit`](crate::Error::Fit) for a failed fit unless
    ///   `continue_on_failure` is set
    /// - [`Error::MissingStatistic`](crate::Error::MissingStatistic) if the
    ///   reference or a recorded row lacks a dataset
    pub fn run(&self, config: &MonteCarloConfig) -> Result<MonteCarloOutcome> {
        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
        let bootstrap = ParametricBootstrap::new(seed);

        info!(
            n_iterations = config.n_iterations,
            continue_on_failure = config.continue_on_failure,
            seed,
            n_datasets = self.data.len(),
            "computing goodness of fit"
        );

        let mut set = FitSet::new(
            |iteration: usize| bootstrap.replica(&self.data, iteration),
            |_: usize| self.best_fit.clone(),
            |model: H::Model, data: &DataList<H::Data>, minimizer: &Minimizer| {
                self.fitter.fit(model, data, minimizer)
            },
            config.n_iterations,
            ITERATION_NAME,
        )
        .parallel(config.parallel);
        set.set_minimizer(self.minimizer.clone());

        let (parameters, likelihoods) = set.go(config.continue_on_failure)?;
        let report = self.compare(&likelihoods, config.n_iterations)?;

        info!(
            total = report.total,
            n_successful = report.n_successful,
            "goodness of fit computed"
        );

        Ok(MonteCarloOutcome { report, parameters, likelihoods })
    }

    fn compare(&self, likelihoods: &LikelihoodTable, n_iterations: usize) -> Result<GoodnessOfFitReport> {
        let total = Exceedance::new(self.reference.total, n_iterations).compute(&likelihoods.totals());

        let mut datasets = Vec::with_capacity(self.data.len());
        for name in self.data.names() {
            let reference = self.reference.require(name)?;
            let simulated = likelihoods.column(&simulated_name(name))?;
            let fraction = Exceedance::new(reference, n_iterations).compute(&simulated);
            datasets.push((name.to_owned(), fraction));
        }

        Ok(GoodnessOfFitReport {
            total,
            datasets,
            n_requested: n_iterations,
            n_successful: likelihoods.len(),
        })
    }
}
