//! Seams to the fitting machinery this crate drives but does not implement.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::{DataList, Dataset};
use crate::error::BoxError;
use crate::table::{NegLogLikelihood, ParameterValues};

/// Identity and algorithm of the minimizer used for a fit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Minimizer {
    /// Minimizer name (e.g. `"minuit"`)
    pub name: String,
    /// Optional algorithm within that minimizer (e.g. `"migrad"`)
    pub algorithm: Option<String>,
}

impl Minimizer {
    /// Minimizer with its default algorithm
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), algorithm: None }
    }

    /// Fluent builder: select an algorithm.
    #[must_use]
    pub fn algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = Some(algorithm.into());
        self
    }
}

impl fmt::Display for Minimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.algorithm {
            Some(algorithm) => write!(f, "{}/{}", self.name, algorithm),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Outcome of one successful fit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FitResult {
    /// Best-fit parameter values
    pub parameters: ParameterValues,
    /// `-log(likelihood)` at the minimum, total and per dataset
    pub likelihood: NegLogLikelihood,
}

/// Fits a model to a list of datasets.
///
/// Per-dataset values in the returned [`FitResult`] are keyed by the names of
/// the datasets in `data`.
pub trait Fitter<M, D>: Sync {
    /// Minimize `-log(likelihood)` of `model` on `data` with `minimizer`.
    ///
    /// # Errors
    /// Any failure of the underlying optimizer (no convergence, invalid
    /// likelihood, ...).
    fn fit(&self, model: M, data: &DataList<D>, minimizer: &Minimizer) -> Result<FitResult, BoxError>;
}

impl<M, D, F> Fitter<M, D> for F
where
    F: Fn(M, &DataList<D>, &Minimizer) -> Result<FitResult, BoxError> + Sync,
{
    #[inline]
    fn fit(&self, model: M, data: &DataList<D>, minimizer: &Minimizer) -> Result<FitResult, BoxError> {
        self(model, data, minimizer)
    }
}

/// A model that has already been fitted to its data.
pub trait FittedModel {
    /// The model being fitted; `Clone` must produce an independent deep copy.
    type Model: Clone;
    /// Dataset kind the model was fitted to.
    type Data: Dataset + Clone;
    /// Optimizer able to refit copies of the model.
    type Fitter: Fitter<Self::Model, Self::Data>;

    /// Copy of the model with its parameters at the best fit.
    fn best_fit(&self) -> Self::Model;

    /// Minimizer used for the completed fit.
    fn minimizer_in_use(&self) -> Minimizer;

    /// Datasets the model was fitted to.
    fn data_list(&self) -> &DataList<Self::Data>;

    /// Optimizer to use for refits.
    fn fitter(&self) -> Self::Fitter;
}
