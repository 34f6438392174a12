//! Hypothesis tests for comparing score distributions.
//!
//! Three tests are provided:
//!
//! - [`t_test`]: Welch's two-sample t-test (unequal variances)
//! - [`mann_whitney_test`]: rank-based two-sample test (normal approximation
//!   with tie and continuity corrections)
//! - [`one_sample_t_test`]: one-sample t-test against a target mean, the
//!   primitive behind calibration checks
//!
//! Each test reports the statistic, p-value, an effect size with a
//! qualitative interpretation, a significance flag at the caller's alpha,
//! and a human-readable conclusion.
//!
//! Groups with fewer than two observations are rejected with a [`TestError`]
//! instead of inheriting library-specific NaN behavior; zero-variance inputs
//! follow explicit guards (statistic 0 and p = 1 when the means coincide).

use serde::{Deserialize, Serialize};

use crate::{
    descriptive::{mean, percentile, sample_std_dev, sample_variance},
    distribution::{normal_cdf, students_t_cdf},
};

/// Direction of the alternative hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alternative {
    /// The group means/medians differ (either direction).
    #[default]
    TwoSided,
    /// Group 1 is smaller than group 2.
    Less,
    /// Group 1 is larger than group 2.
    Greater,
}

/// Qualitative interpretation of an effect size magnitude.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum EffectInterpretation {
    #[display("negligible")]
    Negligible,
    #[display("small")]
    Small,
    #[display("medium")]
    Medium,
    #[display("large")]
    Large,
    #[display("very_large")]
    VeryLarge,
}

impl EffectInterpretation {
    /// Buckets an effect size by its magnitude.
    ///
    /// Thresholds on the absolute value: < 0.2 negligible, < 0.5 small,
    /// < 0.8 medium, < 1.2 large, otherwise very large.
    ///
    /// # Examples
    ///
    /// ```
    /// use dicee_stats::hypothesis::EffectInterpretation;
    ///
    /// assert_eq!(
    ///     EffectInterpretation::from_effect_size(-0.3),
    ///     EffectInterpretation::Small
    /// );
    /// ```
    #[must_use]
    pub fn from_effect_size(effect: f64) -> Self {
        let magnitude = effect.abs();
        if magnitude < 0.2 {
            Self::Negligible
        } else if magnitude < 0.5 {
            Self::Small
        } else if magnitude < 0.8 {
            Self::Medium
        } else if magnitude < 1.2 {
            Self::Large
        } else {
            Self::VeryLarge
        }
    }
}

/// Result of a statistical hypothesis test.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// Name of the test performed.
    pub test_name: &'static str,
    /// Test statistic (t or U depending on the test).
    pub statistic: f64,
    /// Two- or one-tailed p-value per the requested alternative.
    pub p_value: f64,
    /// Cohen's d or rank-biserial correlation.
    pub effect_size: f64,
    /// Qualitative bucket for the effect size magnitude.
    pub effect_interpretation: EffectInterpretation,
    /// Whether `p_value < alpha`.
    pub significant: bool,
    /// Human-readable conclusion.
    pub conclusion: String,
}

/// Rejected test input.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TestError {
    #[display("{group} is empty")]
    EmptySample { group: &'static str },
    #[display("{group} has {len} value(s); at least 2 are required")]
    TooFewSamples { group: &'static str, len: usize },
}

fn check_sample(group: &'static str, values: &[f64]) -> Result<(), TestError> {
    match values.len() {
        0 => Err(TestError::EmptySample { group }),
        1 => Err(TestError::TooFewSamples {
            group,
            len: values.len(),
        }),
        _ => Ok(()),
    }
}

/// Cohen's d effect size with pooled standard deviation.
///
/// Uses the (n1 + n2 - 2) degrees-of-freedom pooling; returns 0 when the
/// pooled standard deviation is 0.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn cohens_d(group1: &[f64], group2: &[f64]) -> f64 {
    let n1 = group1.len() as f64;
    let n2 = group2.len() as f64;
    let pooled_var =
        ((n1 - 1.0) * sample_variance(group1) + (n2 - 1.0) * sample_variance(group2))
            / (n1 + n2 - 2.0);
    let pooled_std = pooled_var.sqrt();
    if pooled_std == 0.0 {
        return 0.0;
    }
    (mean(group1) - mean(group2)) / pooled_std
}

fn p_from_t(t: f64, df: f64, alternative: Alternative) -> f64 {
    let p = match alternative {
        Alternative::TwoSided => 2.0 * (1.0 - students_t_cdf(t.abs(), df)),
        Alternative::Less => students_t_cdf(t, df),
        Alternative::Greater => 1.0 - students_t_cdf(t, df),
    };
    p.clamp(0.0, 1.0)
}

/// Statistic and p-value when the standard error collapses to zero.
fn degenerate_t(diff: f64, alternative: Alternative) -> (f64, f64) {
    if diff == 0.0 {
        return (0.0, 1.0);
    }
    let statistic = f64::INFINITY.copysign(diff);
    let p = match alternative {
        Alternative::TwoSided => 0.0,
        Alternative::Greater => {
            if diff > 0.0 {
                0.0
            } else {
                1.0
            }
        }
        Alternative::Less => {
            if diff < 0.0 {
                0.0
            } else {
                1.0
            }
        }
    };
    (statistic, p)
}

/// Performs Welch's two-sample t-test (unequal variances).
///
/// The effect size is Cohen's d with pooled standard deviation; degrees of
/// freedom follow the Welch-Satterthwaite approximation.
///
/// # Examples
///
/// ```
/// use dicee_stats::hypothesis::{Alternative, t_test};
///
/// let g1 = [305.0, 312.0, 298.0, 320.0, 315.0];
/// let g2 = [280.0, 275.0, 290.0, 285.0, 270.0];
/// let result = t_test(&g1, &g2, 0.05, Alternative::TwoSided).unwrap();
/// assert!(result.significant);
/// assert!(result.statistic > 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn t_test(
    group1: &[f64],
    group2: &[f64],
    alpha: f64,
    alternative: Alternative,
) -> Result<TestResult, TestError> {
    check_sample("group 1", group1)?;
    check_sample("group 2", group2)?;

    let n1 = group1.len() as f64;
    let n2 = group2.len() as f64;
    let mean1 = mean(group1);
    let mean2 = mean(group2);
    let var1 = sample_variance(group1);
    let var2 = sample_variance(group2);

    let se_squared = var1 / n1 + var2 / n2;
    let (statistic, p_value) = if se_squared > 0.0 {
        let t = (mean1 - mean2) / se_squared.sqrt();
        let df = se_squared * se_squared
            / ((var1 / n1).powi(2) / (n1 - 1.0) + (var2 / n2).powi(2) / (n2 - 1.0));
        (t, p_from_t(t, df, alternative))
    } else {
        degenerate_t(mean1 - mean2, alternative)
    };

    let effect_size = cohens_d(group1, group2);
    let significant = p_value < alpha;
    let conclusion = if significant {
        let direction = if mean1 > mean2 { "higher" } else { "lower" };
        format!(
            "Group 1 mean ({mean1:.2}) is significantly {direction} than Group 2 ({mean2:.2})"
        )
    } else {
        format!("No significant difference between groups (p={p_value:.4})")
    };

    Ok(TestResult {
        test_name: "Welch's t-test",
        statistic,
        p_value,
        effect_size,
        effect_interpretation: EffectInterpretation::from_effect_size(effect_size),
        significant,
        conclusion,
    })
}

/// Performs the Mann-Whitney U test (non-parametric two-sample comparison).
///
/// Ties receive average ranks; the p-value uses the normal approximation
/// with tie correction and a 0.5 continuity correction. The effect size is
/// the rank-biserial correlation `r = 1 - 2U / (n1 * n2)`.
#[expect(clippy::cast_precision_loss)]
pub fn mann_whitney_test(
    group1: &[f64],
    group2: &[f64],
    alpha: f64,
    alternative: Alternative,
) -> Result<TestResult, TestError> {
    check_sample("group 1", group1)?;
    check_sample("group 2", group2)?;

    let n1 = group1.len() as f64;
    let n2 = group2.len() as f64;
    let n = n1 + n2;

    let combined: Vec<f64> = group1.iter().chain(group2.iter()).copied().collect();
    let ranks = average_ranks(&combined);
    let rank_sum1: f64 = ranks[..group1.len()].iter().sum();
    let u1 = rank_sum1 - n1 * (n1 + 1.0) / 2.0;

    let mu = n1 * n2 / 2.0;
    let tie_term = tie_correction(&combined);
    let sigma_squared = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));

    let p_value = if sigma_squared > 0.0 {
        let sigma = sigma_squared.sqrt();
        let p = match alternative {
            Alternative::TwoSided => {
                let z = ((u1 - mu).abs() - 0.5) / sigma;
                2.0 * (1.0 - normal_cdf(z))
            }
            Alternative::Greater => 1.0 - normal_cdf((u1 - mu - 0.5) / sigma),
            Alternative::Less => normal_cdf((u1 - mu + 0.5) / sigma),
        };
        p.clamp(0.0, 1.0)
    } else {
        // Every observation tied: the test carries no information.
        1.0
    };

    let effect_size = 1.0 - 2.0 * u1 / (n1 * n2);
    let significant = p_value < alpha;

    let median1 = median_of(group1);
    let median2 = median_of(group2);
    let conclusion = if significant {
        let direction = if median1 > median2 { "higher" } else { "lower" };
        format!(
            "Group 1 median ({median1:.2}) is significantly {direction} than Group 2 ({median2:.2})"
        )
    } else {
        format!("No significant difference between groups (p={p_value:.4})")
    };

    Ok(TestResult {
        test_name: "Mann-Whitney U",
        statistic: u1,
        p_value,
        effect_size,
        effect_interpretation: EffectInterpretation::from_effect_size(effect_size),
        significant,
        conclusion,
    })
}

/// Performs a one-sample t-test of `values` against `target` (two-sided).
///
/// The effect size is the one-sample Cohen's d, `(mean - target) / std`,
/// or 0 when the standard deviation is 0.
#[expect(clippy::cast_precision_loss)]
pub fn one_sample_t_test(
    values: &[f64],
    target: f64,
    alpha: f64,
) -> Result<TestResult, TestError> {
    check_sample("sample", values)?;

    let n = values.len() as f64;
    let sample_mean = mean(values);
    let std_dev = sample_std_dev(values);
    let se = std_dev / n.sqrt();

    let (statistic, p_value) = if se > 0.0 {
        let t = (sample_mean - target) / se;
        (t, p_from_t(t, n - 1.0, Alternative::TwoSided))
    } else {
        degenerate_t(sample_mean - target, Alternative::TwoSided)
    };

    let effect_size = if std_dev == 0.0 {
        0.0
    } else {
        (sample_mean - target) / std_dev
    };
    let significant = p_value < alpha;
    let conclusion = if significant {
        format!(
            "Sample mean ({sample_mean:.2}) differs significantly from target ({target:.2})"
        )
    } else {
        format!("No significant deviation from target (p={p_value:.4})")
    };

    Ok(TestResult {
        test_name: "One-sample t-test",
        statistic,
        p_value,
        effect_size,
        effect_interpretation: EffectInterpretation::from_effect_size(effect_size),
        significant,
        conclusion,
    })
}

/// Assigns 1-based ranks, averaging over ties.
#[expect(clippy::cast_precision_loss)]
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg_rank;
        }
        i = j + 1;
    }
    ranks
}

/// Sum of `t^3 - t` over tie groups of size `t`.
#[expect(clippy::cast_precision_loss)]
fn tie_correction(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut total = 0.0;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j + 1 < sorted.len() && sorted[j + 1] == sorted[i] {
            j += 1;
        }
        let t = (j - i + 1) as f64;
        total += t * t * t - t;
        i = j + 1;
    }
    total
}

fn median_of(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile(&sorted, 50.0)
}
