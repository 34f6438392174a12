//! Descriptive statistics for score distributions.

use serde::{Deserialize, Serialize};

/// Summary statistics for a score distribution.
///
/// Matches the `DescriptiveStats` record of the simulation wire schema:
/// serialized field names are camelCase (`stdDev`, `ci95Lower`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreStats {
    /// Number of observations.
    pub n: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (n-1 denominator; 0 when n <= 1).
    pub std_dev: f64,
    /// Median (linear interpolation between the two middle values).
    pub median: f64,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
    /// 25th percentile.
    pub q1: f64,
    /// 75th percentile.
    pub q3: f64,
    /// Lower bound of the 95% confidence interval of the mean.
    pub ci95_lower: f64,
    /// Upper bound of the 95% confidence interval of the mean.
    pub ci95_upper: f64,
}

impl ScoreStats {
    /// Computes summary statistics over `values`.
    ///
    /// An empty slice yields the all-zero summary rather than an error; this
    /// is the documented degenerate-input policy so that callers can report
    /// "no data" groups uniformly.
    ///
    /// # Examples
    ///
    /// ```
    /// use dicee_stats::descriptive::ScoreStats;
    ///
    /// let stats = ScoreStats::from_values(&[1.0, 2.0, 3.0, 4.0]);
    /// assert_eq!(stats.n, 4);
    /// assert_eq!(stats.mean, 2.5);
    /// assert_eq!(stats.median, 2.5);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len();
        if n == 0 {
            return Self {
                n: 0,
                mean: 0.0,
                std_dev: 0.0,
                median: 0.0,
                min: 0.0,
                max: 0.0,
                q1: 0.0,
                q3: 0.0,
                ci95_lower: 0.0,
                ci95_upper: 0.0,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = mean(values);
        let std_dev = sample_std_dev(values);
        let se = std_dev / (n as f64).sqrt();
        let ci_margin = 1.96 * se;

        Self {
            n,
            mean,
            std_dev,
            median: percentile(&sorted, 50.0),
            min: sorted[0],
            max: sorted[n - 1],
            q1: percentile(&sorted, 25.0),
            q3: percentile(&sorted, 75.0),
            ci95_lower: mean - ci_margin,
            ci95_upper: mean + ci_margin,
        }
    }

    /// Interquartile range.
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Width of the 95% confidence interval.
    #[must_use]
    pub fn ci_width(&self) -> f64 {
        self.ci95_upper - self.ci95_lower
    }
}

/// Arithmetic mean of `values`; 0 for an empty slice.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance with n-1 denominator; 0 when fewer than two values.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn sample_variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n <= 1 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64
}

/// Sample standard deviation with n-1 denominator; 0 when fewer than two
/// values.
#[must_use]
pub fn sample_std_dev(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// Computes a percentile from pre-sorted data using linear interpolation
/// between closest ranks.
///
/// `percentile(sorted, 50.0)` equals the conventional median (the average of
/// the two middle values for even-length input). Returns `f64::NAN` for an
/// empty slice.
///
/// # Panics
///
/// Panics in debug mode if `sorted_values` is not sorted in ascending order.
#[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    debug_assert!(
        sorted_values.is_sorted_by(|a, b| a <= b),
        "values must be sorted in ascending order"
    );
    if sorted_values.is_empty() {
        return f64::NAN;
    }
    let h = (sorted_values.len() - 1) as f64 * percentile / 100.0;
    let lo = h.floor().max(0.0) as usize;
    let hi = (lo + 1).min(sorted_values.len() - 1);
    sorted_values[lo] + (h - lo as f64) * (sorted_values[hi] - sorted_values[lo])
}
