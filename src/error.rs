//! Error types for mcgof

use thiserror::Error;

/// Boxed error produced by an external collaborator (dataset, fitter).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// mcgof error type
#[derive(Error, Debug)]
pub enum Error {
    /// A dataset could not produce a simulated replica of itself
    #[error("failed to simulate dataset '{dataset}': {source}")]
    Simulation {
        /// Name of the source dataset
        dataset: String,
        /// Error reported by the dataset
        #[source]
        source: BoxError,
    },

    /// Fitting one iteration failed
    #[error("fit failed at iteration {iteration}: {source}")]
    Fit {
        /// 0-based iteration index
        iteration: usize,
        /// Error reported by the fitter
        #[source]
        source: BoxError,
    },

    /// A statistic expected for this key was not recorded
    #[error("no -log(likelihood) recorded for '{0}'")]
    MissingStatistic(String),

    /// Two datasets (or table rows) share a name
    #[error("duplicate dataset name '{0}'")]
    DuplicateDataset(String),

    /// Zero iterations were requested
    #[error("number of iterations must be positive")]
    NoIterations,

    /// `FitSet::go` was called before a minimizer was set
    #[error("minimizer has not been set")]
    MinimizerNotSet,

    /// A CSV table lacks a required column
    #[error("column '{0}' not found")]
    MissingColumn(String),

    /// A CSV cell could not be parsed as a number
    #[error("invalid value for '{key}': '{value}'")]
    InvalidValue {
        /// Row key
        key: String,
        /// Raw cell content
        value: String,
    },

    /// A CSV table contains no data rows
    #[error("table contains no data rows")]
    EmptyTable,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
