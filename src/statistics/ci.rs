use num_traits::Float;
use statrs::distribution::{ContinuousCDF, Normal};

/// Closed interval `[lower, upper]` around an optional point estimate.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Interval<T> {
    pub lower: T,
    pub upper: T,
    pub estimate: Option<T>,
    /// Coverage the bounds were computed for
    pub confidence: Option<f64>,
}

impl<T: Float> Interval<T> {
    #[inline]
    pub fn new(lower: T, upper: T) -> Self {
        Self { lower, upper, estimate: None, confidence: None }
    }

    /// `estimate ± error`
    pub fn around(estimate: T, error: T) -> Self {
        Self { estimate: Some(estimate), ..Self::new(estimate - error, estimate + error) }
    }

    #[must_use]
    pub fn with_confidence(self, confidence: f64) -> Self {
        Self { confidence: Some(confidence), ..self }
    }

    /// Whether `value` lies inside the bounds, both ends included.
    #[inline]
    pub fn contains(&self, value: T) -> bool {
        self.lower <= value && value <= self.upper
    }

    #[inline]
    pub fn width(&self) -> T {
        self.upper - self.lower
    }

    /// Half of [`width`](Self::width); the `±` error of a symmetric interval.
    #[inline]
    pub fn half_width(&self) -> T {
        self.width() / (T::one() + T::one())
    }

    /// Both bounds and the estimate restricted to `[lo, hi]`.
    #[must_use]
    pub fn clamp(self, lo: T, hi: T) -> Self {
        let clip = |x: T| x.max(lo).min(hi);
        Self {
            lower: clip(self.lower),
            upper: clip(self.upper),
            estimate: self.estimate.map(clip),
            confidence: self.confidence,
        }
    }

    /// Undefined interval, used when nothing was sampled.
    pub fn nan() -> Self {
        Self::new(T::nan(), T::nan())
    }
}

/// Two-sided standard normal quantile `z` for `confidence`, i.e.
/// `Φ⁻¹(1 − (1 − confidence)/2)`.
///
/// # Panics
/// Panics if `confidence ∉ (0, 1)`.
pub fn z_score(confidence: f64) -> f64 {
    assert!(
        confidence > 0.0 && confidence < 1.0,
        "confidence must be in (0, 1), got {confidence}"
    );
    let alpha = 1.0 - confidence;
    Normal::new(0.0, 1.0)
        .expect("Valid N(0,1) distribution")
        .inverse_cdf(1.0 - alpha / 2.0)
}

/// Normal-approximation interval for a Monte Carlo proportion `p` estimated
/// from `n` draws: `p ± z·sqrt(p(1−p)/n)`, clipped to `[0, 1]`.
///
/// Returns [`Interval::nan`] for `n == 0` or a non-finite `p`.
pub fn proportion_interval(p: f64, n: usize, confidence: f64) -> Interval<f64> {
    if n == 0 || !p.is_finite() {
        return Interval::nan();
    }
    let se = (p * (1.0 - p) / n as f64).sqrt();
    Interval::around(p, z_score(confidence) * se)
        .with_confidence(confidence)
        .clamp(0.0, 1.0)
}
