//! Streaming summary statistics.

use serde::{Deserialize, Serialize};

/// Constant-memory accumulator for the moments of a stream of values.
///
/// Values are folded in one at a time, so memory does not grow with the
/// number of observations. The price is that results are not bit-exact
/// against a two-pass computation and depend slightly on observation order.
///
/// Weighted observations behave as repeated observations: adding `x` with
/// weight 2 is equivalent to adding `x` twice.
///
/// # Example
///
/// ```
/// use ml_types::OnlineStats;
///
/// let mut stats = OnlineStats::new();
/// for x in [1.0, 2.0, 3.0, 4.0] {
///     stats.add(x);
/// }
///
/// assert!((stats.mean() - 2.5).abs() < 1e-12);
/// assert_eq!(stats.min(), Some(1.0));
/// assert_eq!(stats.max(), Some(4.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnlineStats {
    count: usize,
    weight_sum: f64,
    mean: f64,
    m2: f64,
    m3: f64,
    m4: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl OnlineStats {
    /// Creates an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: 0,
            weight_sum: 0.0,
            mean: 0.0,
            m2: 0.0,
            m3: 0.0,
            m4: 0.0,
            min: None,
            max: None,
        }
    }

    /// Observes a value with unit weight.
    pub fn add(&mut self, x: f64) {
        self.add_weighted(x, 1.0);
    }

    /// Observes a value with the given weight.
    ///
    /// Observations with a weight that is not strictly positive and finite
    /// are ignored.
    pub fn add_weighted(&mut self, x: f64, weight: f64) {
        if !(weight.is_finite() && weight > 0.0) {
            return;
        }
        let single = Self {
            count: 1,
            weight_sum: weight,
            mean: x,
            m2: 0.0,
            m3: 0.0,
            m4: 0.0,
            min: Some(x),
            max: Some(x),
        };
        self.merge(&single);
    }

    /// Folds another accumulator into this one.
    ///
    /// The result is the same as if every value observed by `other` had been
    /// observed by `self`.
    pub fn merge(&mut self, other: &Self) {
        if other.weight_sum <= 0.0 {
            return;
        }
        if self.weight_sum <= 0.0 {
            *self = other.clone();
            return;
        }

        let na = self.weight_sum;
        let nb = other.weight_sum;
        let n = na + nb;
        let delta = other.mean - self.mean;
        let delta_n = delta / n;
        let delta_n2 = delta_n * delta_n;
        let term = delta * delta_n * na * nb;

        let m4 = self.m4
            + other.m4
            + term * delta_n2 * nb.mul_add(nb, na.mul_add(na, -na * nb))
            + 6.0 * delta_n2 * (na * na).mul_add(other.m2, nb * nb * self.m2)
            + 4.0 * delta_n * na.mul_add(other.m3, -nb * self.m3);
        let m3 = self.m3
            + other.m3
            + term * delta_n * (na - nb)
            + 3.0 * delta_n * na.mul_add(other.m2, -nb * self.m2);
        let m2 = self.m2 + other.m2 + term;

        self.mean = nb.mul_add(delta_n, self.mean);
        self.m2 = m2;
        self.m3 = m3;
        self.m4 = m4;
        self.weight_sum = n;
        self.count += other.count;
        self.min = min_opt(self.min, other.min);
        self.max = max_opt(self.max, other.max);
    }

    /// Returns the number of observations.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns the total weight observed.
    #[must_use]
    pub const fn sum_of_weights(&self) -> f64 {
        self.weight_sum
    }

    /// Returns `true` if nothing has been observed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the weighted mean, or `0.0` when empty.
    #[must_use]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Returns the sample variance (divides by `n - 1`).
    ///
    /// Returns `0.0` when the total weight is at most one.
    #[must_use]
    pub fn variance(&self) -> f64 {
        if self.weight_sum <= 1.0 {
            return 0.0;
        }
        self.m2 / (self.weight_sum - 1.0)
    }

    /// Returns the population variance (divides by `n`).
    #[must_use]
    pub fn population_variance(&self) -> f64 {
        if self.weight_sum <= 0.0 {
            return 0.0;
        }
        self.m2 / self.weight_sum
    }

    /// Returns the sample standard deviation.
    #[must_use]
    pub fn standard_deviation(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Returns the sample skewness, or `0.0` for degenerate input.
    #[must_use]
    pub fn skewness(&self) -> f64 {
        if self.m2 <= 0.0 {
            return 0.0;
        }
        self.weight_sum.sqrt() * self.m3 / self.m2.powf(1.5)
    }

    /// Returns the excess kurtosis, or `0.0` for degenerate input.
    #[must_use]
    pub fn kurtosis(&self) -> f64 {
        if self.m2 <= 0.0 {
            return 0.0;
        }
        self.weight_sum * self.m4 / (self.m2 * self.m2) - 3.0
    }

    /// Returns the smallest observed value.
    #[must_use]
    pub const fn min(&self) -> Option<f64> {
        self.min
    }

    /// Returns the largest observed value.
    #[must_use]
    pub const fn max(&self) -> Option<f64> {
        self.max
    }
}

fn min_opt(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

fn max_opt(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

impl Extend<f64> for OnlineStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.add(x);
        }
    }
}

impl FromIterator<f64> for OnlineStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::new();
        stats.extend(iter);
        stats
    }
}
