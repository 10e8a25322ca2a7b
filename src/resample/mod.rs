mod parametric;

pub use parametric::{ParametricBootstrap, ReplicaIter};

/// Resampling scheme producing a stream of resamples of `T`.
pub trait Re<T> {
    /// One resample
    type Item;
    /// Resamples of `t`, in order.
    fn re(&self, t: &T) -> impl Iterator<Item = Self::Item>;
}
