use rand::RngCore;

use crate::error::{BoxError, Error, Result};

/// Suffix appended to a dataset name to label its simulated replica.
pub const SIM_SUFFIX: &str = "_sim";

/// Name given to the simulated replica of dataset `name`.
#[inline]
pub fn simulated_name(name: &str) -> String {
    format!("{name}{SIM_SUFFIX}")
}

/// A named set of observations that can generate replicas of itself.
///
/// Replicas are drawn under whatever model the dataset currently has loaded;
/// how that happens is up to the implementor. `simulated` must not mutate
/// `self` and must take all of its randomness from `rng`, so that a fixed
/// seed reproduces the same replica.
pub trait Dataset: Sized {
    /// Unique name of this dataset inside a [`DataList`].
    fn name(&self) -> &str;

    /// Draw a simulated replica of this dataset, named `name`.
    ///
    /// # Errors
    /// Returns the implementor's error when no replica can be produced
    /// (malformed state, unsupported dataset kind, ...).
    fn simulated(&self, name: &str, rng: &mut dyn RngCore) -> std::result::Result<Self, BoxError>;
}

/// Ordered collection of datasets with unique names.
#[derive(Debug, Clone)]
pub struct DataList<D> {
    datasets: Vec<D>,
}

impl<D> Default for DataList<D> {
    fn default() -> Self {
        Self { datasets: Vec::new() }
    }
}

impl<D: Dataset> DataList<D> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from datasets, keeping their order.
    ///
    /// # Errors
    /// [`Error::DuplicateDataset`] if two datasets share a name.
    pub fn from_datasets<I: IntoIterator<Item = D>>(datasets: I) -> Result<Self> {
        let mut list = Self::new();
        for dataset in datasets {
            list.insert(dataset)?;
        }
        Ok(list)
    }

    /// Append a dataset.
    ///
    /// # Errors
    /// [`Error::DuplicateDataset`] if a dataset with the same name is present.
    pub fn insert(&mut self, dataset: D) -> Result<()> {
        if self.contains(dataset.name()) {
            return Err(Error::DuplicateDataset(dataset.name().to_owned()));
        }
        self.datasets.push(dataset);
        Ok(())
    }

    /// Look up a dataset by name
    pub fn get(&self, name: &str) -> Option<&D> {
        self.datasets.iter().find(|d| d.name() == name)
    }

    /// Whether a dataset with this name is present
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Dataset names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datasets.iter().map(Dataset::name)
    }

    /// Datasets in insertion order
    pub fn values(&self) -> std::slice::Iter<'_, D> {
        self.datasets.iter()
    }

    /// Number of datasets
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Whether the list holds no dataset
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Simulate a replica of every dataset, named `<name>_sim`, in order.
    ///
    /// # Errors
    /// [`Error::Simulation`] for the first dataset that fails; the partial
    /// replica list is dropped.
    pub fn simulated(&self, rng: &mut dyn RngCore) -> Result<Self> {
        let mut replicas = Vec::with_capacity(self.len());
        for dataset in &self.datasets {
            let replica = dataset
                .simulated(&simulated_name(dataset.name()), rng)
                .map_err(|source| Error::Simulation {
                    dataset: dataset.name().to_owned(),
                    source,
                })?;
            replicas.push(replica);
        }
        Self::from_datasets(replicas)
    }
}

impl<'a, D> IntoIterator for &'a DataList<D> {
    type Item = &'a D;
    type IntoIter = std::slice::Iter<'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.datasets.iter()
    }
}

impl<D> IntoIterator for DataList<D> {
    type Item = D;
    type IntoIter = std::vec::IntoIter<D>;

    fn into_iter(self) -> Self::IntoIter {
        self.datasets.into_iter()
    }
}
