//! Monte Carlo goodness of fit for already optimized likelihood models.
//!
//! Given a completed fit, [`GoodnessOfFit`] simulates synthetic datasets
//! under the best-fit model, refits a fresh copy of the model to each of them
//! and reports, per dataset and in total, the fraction of simulations whose
//! `-log(likelihood)` is at least as large as the observed one.
//!
//! The optimizer, the simulation of datasets and the model itself stay
//! outside this crate, behind [`FittedModel`], [`Dataset`] and [`Fitter`].

mod data;
mod display;
mod error;
mod fit_set;
mod gof;
mod model;
mod resample;
mod statistics;
mod table;

#[cfg(test)]
mod testing;

pub use crate::data::{DataList, Dataset, SIM_SUFFIX, simulated_name};
pub use crate::error::{BoxError, Error, Result};
pub use crate::fit_set::FitSet;
pub use crate::gof::{GoodnessOfFit, GoodnessOfFitReport, ITERATION_NAME, MonteCarloConfig, MonteCarloOutcome};
pub use crate::model::{FitResult, FittedModel, Fitter, Minimizer};
pub use crate::resample::*;
pub use crate::statistics::*;
pub use crate::table::{
    IterationTable, LikelihoodTable, NLL_COLUMN, NegLogLikelihood, ParameterTable, ParameterValues, TOTAL_KEY,
};
pub use rand;
