use super::Statistic;

/// Fraction of values at least as large as a reference.
///
/// ```text
/// p = #{ xᵢ : xᵢ ≥ reference } / denominator
/// ```
/// The denominator is given explicitly rather than taken from the data, so
/// values that were never produced (failed iterations) still count against
/// the fraction. Ties count as exceedances. `NaN` values never exceed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exceedance {
    pub reference: f64,
    pub denominator: usize,
}

impl Exceedance {
    #[inline]
    pub fn new(reference: f64, denominator: usize) -> Self {
        Self { reference, denominator }
    }

    /// Number of values `>= reference`.
    #[inline]
    pub fn count(&self, values: &[f64]) -> usize {
        values.iter().filter(|&&x| x >= self.reference).count()
    }
}

impl<D> Statistic<D, f64> for Exceedance
where
    D: AsRef<[f64]> + ?Sized,
{
    /// `NaN` for a zero denominator.
    fn compute(&self, data: &D) -> f64 {
        if self.denominator == 0 {
            return f64::NAN;
        }
        self.count(data.as_ref()) as f64 / self.denominator as f64
    }
}
