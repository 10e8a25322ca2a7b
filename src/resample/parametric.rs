use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::{DataList, Dataset};
use crate::error::Result;
use super::Re;

/// Parametric bootstrap over a [`DataList`].
///
/// Replica `i` is drawn from its own RNG seeded with `seed + i` (wrapping), so
/// a replica depends only on the seed and its index, never on the order in
/// which replicas are requested.
#[derive(Debug, Clone, Copy)]
pub struct ParametricBootstrap {
    pub seed: u64,
}

impl ParametricBootstrap {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// RNG dedicated to replica `iteration`.
    #[inline]
    pub fn rng(&self, iteration: usize) -> StdRng {
        StdRng::seed_from_u64(self.seed.wrapping_add(iteration as u64))
    }

    /// Simulated replica number `iteration` of `data`.
    ///
    /// # Errors
    /// The first simulation failure, see [`DataList::simulated`].
    pub fn replica<D: Dataset>(&self, data: &DataList<D>, iteration: usize) -> Result<DataList<D>> {
        data.simulated(&mut self.rng(iteration))
    }
}

impl<D: Dataset> Re<DataList<D>> for ParametricBootstrap {
    type Item = Result<DataList<D>>;

    fn re(&self, data: &DataList<D>) -> impl Iterator<Item = Self::Item> {
        ReplicaIter { bootstrap: *self, data, iteration: 0 }
    }
}

/// Endless iterator of replicas, see [`Re::re`].
pub struct ReplicaIter<'a, D> {
    bootstrap: ParametricBootstrap,
    data: &'a DataList<D>,
    iteration: usize,
}

impl<D: Dataset> Iterator for ReplicaIter<'_, D> {
    type Item = Result<DataList<D>>;

    fn next(&mut self) -> Option<Self::Item> {
        let replica = self.bootstrap.replica(self.data, self.iteration);
        self.iteration += 1;
        Some(replica)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Counts;

    fn data() -> DataList<Counts> {
        DataList::from_datasets([
            Counts::new("A", vec![3.0, 5.0, 2.0], vec![3.0, 4.0, 2.5]),
            Counts::new("B", vec![10.0, 12.0], vec![11.0, 11.5]),
        ])
        .unwrap()
    }

    #[test]
    fn same_seed_same_replicas() {
        let data = data();
        let a: Vec<_> = ParametricBootstrap::new(42).re(&data).take(5).map(Result::unwrap).collect();
        let b: Vec<_> = ParametricBootstrap::new(42).re(&data).take(5).map(Result::unwrap).collect();

        for (x, y) in a.iter().zip(&b) {
            for (dx, dy) in x.values().zip(y.values()) {
                assert_eq!(dx.observed, dy.observed);
            }
        }
    }

    #[test]
    fn replica_depends_only_on_its_index() {
        let data = data();
        let bootstrap = ParametricBootstrap::new(9);
        let fourth = bootstrap.re(&data).nth(3).unwrap().unwrap();
        let direct = bootstrap.replica(&data, 3).unwrap();

        assert_eq!(
            fourth.get("A_sim").unwrap().observed,
            direct.get("A_sim").unwrap().observed
        );
    }

    #[test]
    fn replicas_differ_between_iterations() {
        let data = data();
        let bootstrap = ParametricBootstrap::new(1);
        let draws: Vec<Vec<f64>> = (0..20)
            .map(|i| bootstrap.replica(&data, i).unwrap().get("B_sim").unwrap().observed.clone())
            .collect();

        assert!(draws.windows(2).any(|w| w.first() != w.last()));
    }
}
