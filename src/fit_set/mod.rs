//! Repeated fits of fresh models to fresh data.
//!
//! A [`FitSet`] asks two providers for the data and the model of every
//! iteration, fits one to the other and collects the results in iteration
//! order. Iterations only share read access to the providers and the fitter,
//! so they may run on the rayon pool (`rayon` feature).

use tracing::{debug, info, warn};

use crate::data::{DataList, Dataset};
use crate::error::{BoxError, Error, Result};
use crate::model::{FitResult, Fitter, Minimizer};
use crate::table::{LikelihoodTable, ParameterTable};

/// Runs `n_iterations` independent fits.
pub struct FitSet<GD, GM, F> {
    get_data: GD,
    get_model: GM,
    fitter: F,
    n_iterations: usize,
    iteration_name: String,
    minimizer: Option<Minimizer>,
    parallel: bool,
}

impl<GD, GM, F> FitSet<GD, GM, F> {
    /// Create a set of `n_iterations` fits.
    ///
    /// `get_data(i)` and `get_model(i)` provide the data and the starting
    /// model of iteration `i`; rows are labelled `iteration_name`.
    pub fn new(
        get_data: GD,
        get_model: GM,
        fitter: F,
        n_iterations: usize,
        iteration_name: impl Into<String>,
    ) -> Self {
        Self {
            get_data,
            get_model,
            fitter,
            n_iterations,
            iteration_name: iteration_name.into(),
            minimizer: None,
            parallel: false,
        }
    }

    /// Minimizer used for every fit.
    pub fn set_minimizer(&mut self, minimizer: Minimizer) {
        self.minimizer = Some(minimizer);
    }

    /// Fluent builder: run iterations on the rayon pool.
    ///
    /// Without the `rayon` feature the flag is ignored.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Number of requested iterations
    pub fn n_iterations(&self) -> usize {
        self.n_iterations
    }
}

impl<GD, GM, F, M, D> FitSet<GD, GM, F>
where
    GD: Fn(usize) -> Result<DataList<D>> + Sync,
    GM: Fn(usize) -> M + Sync,
    F: Fitter<M, D>,
    M: Send,
    D: Dataset + Send,
{
    /// Run every iteration and collect the fitted parameters and
    /// `-log(likelihood)` values.
    ///
    /// A failing fit is skipped (and logged) when `continue_on_failure` is
    /// set; otherwise it aborts the whole set. Failures of `get_data` always
    /// abort. When running sequentially, no iteration after the aborting one
    /// is started.
    ///
    /// # Errors
    /// - [`Error::NoIterations`] for an empty set
    /// - [`Error::MinimizerNotSet`] before [`set_minimizer`](Self::set_minimizer)
    /// - [`Error::Fit`] for the first failing fit unless `continue_on_failure`
    /// - any error of `get_data`
    pub fn go(&self, continue_on_failure: bool) -> Result<(ParameterTable, LikelihoodTable)> {
        if self.n_iterations == 0 {
            return Err(Error::NoIterations);
        }
        let minimizer = self.minimizer.as_ref().ok_or(Error::MinimizerNotSet)?;

        info!(
            n_iterations = self.n_iterations,
            iteration_name = %self.iteration_name,
            minimizer = %minimizer,
            parallel = self.parallel,
            "starting fit set"
        );

        let fits = if self.parallel {
            self.run_parallel(minimizer, continue_on_failure)?
        } else {
            self.run_sequential(minimizer, continue_on_failure)?
        };

        let mut parameters = ParameterTable::new(self.iteration_name.clone());
        let mut likelihoods = LikelihoodTable::new(self.iteration_name.clone());
        for (iteration, fit) in fits {
            parameters.push(iteration, fit.parameters);
            likelihoods.push(iteration, fit.likelihood);
        }

        info!(
            n_successful = likelihoods.len(),
            n_failed = self.n_iterations - likelihoods.len(),
            "fit set finished"
        );
        Ok((parameters, likelihoods))
    }

    fn run_sequential(&self, minimizer: &Minimizer, continue_on_failure: bool) -> Result<Vec<(usize, FitResult)>> {
        let mut fits = Vec::with_capacity(self.n_iterations);
        for iteration in 0..self.n_iterations {
            if let Some(fit) = self.run_one(iteration, minimizer, continue_on_failure)? {
                fits.push((iteration, fit));
            }
        }
        Ok(fits)
    }

    #[cfg(feature = "rayon")]
    fn run_parallel(&self, minimizer: &Minimizer, continue_on_failure: bool) -> Result<Vec<(usize, FitResult)>> {
        use rayon::prelude::*;

        let fits: Vec<Option<FitResult>> = (0..self.n_iterations)
            .into_par_iter()
            .map(|iteration| self.run_one(iteration, minimizer, continue_on_failure))
            .collect::<Result<_>>()?;

        Ok(fits
            .into_iter()
            .enumerate()
            .filter_map(|(iteration, fit)| fit.map(|fit| (iteration, fit)))
            .collect())
    }

    #[cfg(not(feature = "rayon"))]
    fn run_parallel(&self, minimizer: &Minimizer, continue_on_failure: bool) -> Result<Vec<(usize, FitResult)>> {
        debug!("built without the rayon feature, running sequentially");
        self.run_sequential(minimizer, continue_on_failure)
    }

    fn run_one(&self, iteration: usize, minimizer: &Minimizer, continue_on_failure: bool) -> Result<Option<FitResult>> {
        let data = (self.get_data)(iteration)?;
        let model = (self.get_model)(iteration);

        match self.fitter.fit(model, &data, minimizer).and_then(finite) {
            Ok(fit) => {
                debug!(iteration, total = fit.likelihood.total, "fit converged");
                Ok(Some(fit))
            }
            Err(source) if continue_on_failure => {
                warn!(iteration, error = %source, "fit failed, skipping iteration");
                Ok(None)
            }
            Err(source) => Err(Error::Fit { iteration, source }),
        }
    }
}

fn finite(fit: FitResult) -> std::result::Result<FitResult, BoxError> {
    if fit.likelihood.total.is_finite() {
        Ok(fit)
    } else {
        Err(format!("non-finite -log(likelihood): {}", fit.likelihood.total).into())
    }
}
