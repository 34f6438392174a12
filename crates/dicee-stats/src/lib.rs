//! Statistical analysis utilities for the Dicee project.
//!
//! This crate provides the numeric core shared by the analysis toolkit:
//!
//! - **Descriptive statistics**: mean, sample standard deviation, median,
//!   quartiles, and 95% confidence intervals for score distributions
//! - **Hypothesis testing**: Welch's two-sample t-test, the Mann-Whitney U
//!   test, and a one-sample t-test for calibration checks
//! - **Effect sizes**: Cohen's d and rank-biserial correlation with a
//!   qualitative interpretation scale
//!
//! All functions operate on plain `f64` slices; DataFrame plumbing lives in
//! the `dicee-analysis` crate.
//!
//! # Modules
//!
//! - [`descriptive`]: Summary statistics for score distributions
//! - [`hypothesis`]: Two-sample and one-sample hypothesis tests
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use dicee_stats::descriptive::ScoreStats;
//!
//! let stats = ScoreStats::from_values(&[290.0, 305.0, 310.0, 320.0]);
//! assert_eq!(stats.n, 4);
//! assert_eq!(stats.min, 290.0);
//! assert_eq!(stats.max, 320.0);
//! ```
//!
//! ## Comparing two groups
//!
//! ```
//! use dicee_stats::hypothesis::{Alternative, t_test};
//!
//! let professor = [305.0, 312.0, 298.0, 320.0];
//! let carmen = [280.0, 275.0, 290.0, 285.0];
//! let result = t_test(&professor, &carmen, 0.05, Alternative::TwoSided).unwrap();
//! assert!(result.significant);
//! ```

pub mod descriptive;
mod distribution;
pub mod hypothesis;
