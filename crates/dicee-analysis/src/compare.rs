//! Profile-against-profile comparisons and calibration checks.

use dicee_schema::ProfileId;
use dicee_stats::hypothesis::{
    self, Alternative, EffectInterpretation, TestResult,
};
use polars::prelude::*;

use crate::score_stats::{AnalysisError, column_values, filter_profile};

/// Which two-sample test backs a profile comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::Display)]
pub enum TestMethod {
    /// Welch's t-test (assumes roughly normal scores).
    #[default]
    #[display("t-test")]
    Welch,
    /// Mann-Whitney U (rank-based, no normality assumption).
    #[display("mann-whitney")]
    MannWhitney,
}

/// Final scores of one profile's rows, in frame order.
///
/// A profile with no rows is a [`AnalysisError::NoData`] domain error, not
/// an empty vector; every caller wants to name the missing profile.
pub fn profile_scores(
    frame: &DataFrame,
    profile: ProfileId,
    column: &str,
) -> Result<Vec<f64>, AnalysisError> {
    let subset = filter_profile(frame, profile)?;
    let values = column_values(&subset, column)?;
    if values.is_empty() {
        return Err(AnalysisError::NoData { profile });
    }
    Ok(values)
}

/// Compares two profiles' final scores with the chosen test.
///
/// The conclusion is rewritten to name the profiles and, when the
/// difference is significant, which one performs better.
pub fn compare_profiles(
    frame: &DataFrame,
    profile1: ProfileId,
    profile2: ProfileId,
    alpha: f64,
    method: TestMethod,
) -> Result<TestResult, AnalysisError> {
    let scores1 = profile_scores(frame, profile1, "final_score")?;
    let scores2 = profile_scores(frame, profile2, "final_score")?;

    let mut result = match method {
        TestMethod::Welch => {
            hypothesis::t_test(&scores1, &scores2, alpha, Alternative::TwoSided)?
        }
        TestMethod::MannWhitney => {
            hypothesis::mann_whitney_test(&scores1, &scores2, alpha, Alternative::TwoSided)?
        }
    };

    let mean1 = dicee_stats::descriptive::mean(&scores1);
    let mean2 = dicee_stats::descriptive::mean(&scores2);
    let p = result.p_value;
    result.conclusion = if result.significant {
        let better = if mean1 > mean2 { profile1 } else { profile2 };
        format!(
            "{profile1} (mean={mean1:.2}) vs {profile2} (mean={mean2:.2}): \
             {better} performs significantly better (p={p:.4})"
        )
    } else {
        format!(
            "{profile1} (mean={mean1:.2}) vs {profile2} (mean={mean2:.2}): \
             no significant difference (p={p:.4})"
        )
    };
    Ok(result)
}

/// Checks whether a profile's mean final score is calibrated to a target.
///
/// The profile counts as calibrated when the one-sample t-test fails to
/// reject at `alpha` or the observed mean lies within `tolerance` of the
/// target; a large, well-calibrated sample may reject a tiny deviation, so
/// the tolerance clause is deliberate. `significant` reports the opposite
/// of calibrated.
pub fn test_calibration(
    frame: &DataFrame,
    profile: ProfileId,
    target: f64,
    tolerance: f64,
    alpha: f64,
) -> Result<TestResult, AnalysisError> {
    let scores = profile_scores(frame, profile, "final_score")?;
    let result = hypothesis::one_sample_t_test(&scores, target, alpha)?;

    let mean = dicee_stats::descriptive::mean(&scores);
    let deviation = (mean - target).abs();
    let calibrated = result.p_value >= alpha || deviation <= tolerance;
    let conclusion = if calibrated {
        format!("{profile} is calibrated: mean={mean:.2}, target={target:.1}\u{b1}{tolerance:.1}")
    } else {
        format!(
            "{profile} NOT calibrated: mean={mean:.2} (deviation={deviation:.1} from target {target:.1})"
        )
    };

    Ok(TestResult {
        test_name: "Calibration Test",
        statistic: result.statistic,
        p_value: result.p_value,
        effect_size: result.effect_size,
        effect_interpretation: EffectInterpretation::from_effect_size(result.effect_size),
        significant: !calibrated,
        conclusion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored_frame() -> DataFrame {
        let mut profile_id = vec!["professor"; 8];
        profile_id.extend(["carmen"; 8]);
        let scores: Vec<f64> = vec![
            305.0, 312.0, 298.0, 320.0, 315.0, 301.0, 308.0, 322.0, // professor
            280.0, 275.0, 290.0, 285.0, 270.0, 288.0, 295.0, 278.0, // carmen
        ];
        DataFrame::new(vec![
            Column::new("profile_id".into(), profile_id),
            Column::new("final_score".into(), scores),
        ])
        .unwrap()
    }

    #[test]
    fn test_compare_profiles_names_the_better_profile() {
        let frame = scored_frame();
        let result = compare_profiles(
            &frame,
            ProfileId::Professor,
            ProfileId::Carmen,
            0.05,
            TestMethod::Welch,
        )
        .unwrap();
        assert!(result.significant);
        assert!(result.conclusion.starts_with("professor (mean=310.12)"));
        assert!(result.conclusion.contains("carmen (mean=282.62)"));
        assert!(
            result
                .conclusion
                .contains("professor performs significantly better")
        );
    }

    #[test]
    fn test_compare_profiles_mann_whitney() {
        let frame = scored_frame();
        let result = compare_profiles(
            &frame,
            ProfileId::Carmen,
            ProfileId::Professor,
            0.05,
            TestMethod::MannWhitney,
        )
        .unwrap();
        assert_eq!(result.test_name, "Mann-Whitney U");
        assert!(result.significant);
        assert!(
            result
                .conclusion
                .contains("professor performs significantly better")
        );
    }

    #[test]
    fn test_compare_profiles_missing_profile() {
        let frame = scored_frame();
        let err = compare_profiles(
            &frame,
            ProfileId::Professor,
            ProfileId::Liam,
            0.05,
            TestMethod::Welch,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::NoData {
                profile: ProfileId::Liam
            }
        ));
    }

    #[test]
    fn test_compare_identical_score_vectors() {
        let scores = [300.0, 305.0, 310.0, 295.0];
        let mut profile_id = vec!["riley"; 4];
        profile_id.extend(["liam"; 4]);
        let mut final_score = scores.to_vec();
        final_score.extend(scores);
        let frame = DataFrame::new(vec![
            Column::new("profile_id".into(), profile_id),
            Column::new("final_score".into(), final_score),
        ])
        .unwrap();

        let result = compare_profiles(
            &frame,
            ProfileId::Riley,
            ProfileId::Liam,
            0.05,
            TestMethod::Welch,
        )
        .unwrap();
        assert!(!result.significant);
        assert_eq!(result.effect_size, 0.0);
        assert!(result.conclusion.contains("no significant difference"));
    }

    #[test]
    fn test_calibration_within_tolerance_passes() {
        let frame = scored_frame();
        // Professor mean is 310.12; tolerance absorbs the deviation even
        // though the t-test rejects target 305.
        let result =
            test_calibration(&frame, ProfileId::Professor, 305.0, 10.0, 0.05).unwrap();
        assert_eq!(result.test_name, "Calibration Test");
        assert!(!result.significant);
        assert!(result.conclusion.contains("professor is calibrated"));
        assert!(result.conclusion.contains("target=305.0\u{b1}10.0"));
    }

    #[test]
    fn test_calibration_far_target_fails() {
        let frame = scored_frame();
        let result =
            test_calibration(&frame, ProfileId::Professor, 280.0, 5.0, 0.05).unwrap();
        assert!(result.significant);
        assert!(result.conclusion.contains("professor NOT calibrated"));
        assert!(result.conclusion.contains("deviation=30.1"));
    }

    #[test]
    fn test_calibration_high_p_value_passes_without_tolerance() {
        let frame = scored_frame();
        let result =
            test_calibration(&frame, ProfileId::Professor, 310.0, 0.0, 0.05).unwrap();
        assert!(!result.significant);
        assert!(result.conclusion.contains("is calibrated"));
    }
}
