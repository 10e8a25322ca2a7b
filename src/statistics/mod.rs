mod ci;
mod exceedance;

pub use ci::{Interval, proportion_interval, z_score};
pub use exceedance::Exceedance;

/// A quantity computed from data.
pub trait Statistic<D: ?Sized, T> {
    fn compute(&self, data: &D) -> T;
}
