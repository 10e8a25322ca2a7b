mod csv_io;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Header of the column holding negative log-likelihood values.
pub const NLL_COLUMN: &str = "-log(likelihood)";

/// Key under which the total statistic is stored in flat tables.
pub const TOTAL_KEY: &str = "total";

/// Negative log-likelihood of a fit: the total plus one value per dataset.
///
/// The total is a dedicated field so a dataset named `"total"` can never
/// shadow it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NegLogLikelihood {
    /// Sum over all datasets
    pub total: f64,
    /// Per-dataset values in dataset order
    pub datasets: Vec<(String, f64)>,
}

impl NegLogLikelihood {
    /// Create a value with only the total set
    pub fn new(total: f64) -> Self {
        Self { total, datasets: Vec::new() }
    }

    /// Fluent builder: append the value of one dataset.
    #[must_use]
    pub fn with_dataset(mut self, name: impl Into<String>, value: f64) -> Self {
        self.datasets.push((name.into(), value));
        self
    }

    /// Value recorded for `name`, if any
    pub fn dataset(&self, name: &str) -> Option<f64> {
        self.datasets
            .iter()
            .find(|(key, _)| key == name)
            .map(|&(_, value)| value)
    }

    /// Like [`dataset`](Self::dataset) but a missing key is an error.
    ///
    /// # Errors
    /// [`Error::MissingStatistic`] when no value is recorded for `name`.
    pub fn require(&self, name: &str) -> Result<f64> {
        self.dataset(name)
            .ok_or_else(|| Error::MissingStatistic(name.to_owned()))
    }

    /// Dataset names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datasets.iter().map(|(name, _)| name.as_str())
    }
}

/// Parameter values of one fit, in model order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterValues(pub Vec<(String, f64)>);

impl ParameterValues {
    /// Value of parameter `name`, if present
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|&(_, value)| value)
    }

    /// Parameter names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }
}

impl FromIterator<(String, f64)> for ParameterValues {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One row per successful iteration, labelled by its iteration index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationTable<T> {
    iteration_name: String,
    rows: Vec<(usize, T)>,
}

/// Best-fit parameters of every iteration
pub type ParameterTable = IterationTable<ParameterValues>;

/// Negative log-likelihood of every iteration
pub type LikelihoodTable = IterationTable<NegLogLikelihood>;

impl<T> IterationTable<T> {
    /// Create an empty table whose rows are labelled `iteration_name`
    pub fn new(iteration_name: impl Into<String>) -> Self {
        Self {
            iteration_name: iteration_name.into(),
            rows: Vec::new(),
        }
    }

    /// Append the row of `iteration`
    pub fn push(&mut self, iteration: usize, row: T) {
        self.rows.push((iteration, row));
    }

    /// Label of the iteration index (e.g. `"simulation"`)
    pub fn iteration_name(&self) -> &str {
        &self.iteration_name
    }

    /// Number of recorded rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no row was recorded
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as `(iteration, value)` in iteration order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.rows.iter().map(|(i, row)| (*i, row))
    }

    /// Indices of the recorded iterations
    pub fn iterations(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().map(|(i, _)| *i)
    }
}

impl LikelihoodTable {
    /// Total statistic of every row
    pub fn totals(&self) -> Vec<f64> {
        self.rows.iter().map(|(_, nll)| nll.total).collect()
    }

    /// Statistic of dataset `name` in every row.
    ///
    /// # Errors
    /// [`Error::MissingStatistic`] if any row lacks `name`.
    pub fn column(&self, name: &str) -> Result<Vec<f64>> {
        self.rows.iter().map(|(_, nll)| nll.require(name)).collect()
    }
}
