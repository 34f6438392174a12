//! Experiment definitions and aggregated results.
//!
//! Experiment result files are emitted by the harness as single JSON
//! documents (not NDJSON); [`parse_experiment_results`] parses and
//! validates one such document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use dicee_stats::{descriptive::ScoreStats, hypothesis::EffectInterpretation};
use serde::{Deserialize, Serialize};

use crate::error::{self, ParseError, SchemaError};

/// Decision-making backend of an AI player.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum BrainType {
    #[display("optimal")]
    Optimal,
    #[display("probabilistic")]
    Probabilistic,
    #[display("personality")]
    Personality,
    #[display("random")]
    Random,
    #[display("llm")]
    Llm,
}

/// Category of experiment run by the harness.
///
/// Wire values are UPPERCASE, matching the harness's constants.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExperimentType {
    #[display("CALIBRATION")]
    Calibration,
    #[display("DECISION_QUALITY")]
    #[serde(rename = "DECISION_QUALITY")]
    DecisionQuality,
    #[display("HEAD_TO_HEAD")]
    #[serde(rename = "HEAD_TO_HEAD")]
    HeadToHead,
    #[display("TRAIT_SENSITIVITY")]
    #[serde(rename = "TRAIT_SENSITIVITY")]
    TraitSensitivity,
    #[display("REGRESSION")]
    Regression,
    #[display("ABLATION")]
    Ablation,
}

/// Outcome of one pre-registered hypothesis test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HypothesisTestResult {
    #[serde(alias = "hypothesis_id")]
    pub hypothesis_id: String,
    pub rejected: bool,
    #[serde(alias = "p_value")]
    pub p_value: f64,
    #[serde(alias = "test_statistic")]
    pub test_statistic: f64,
    #[serde(alias = "effect_size")]
    pub effect_size: f64,
    #[serde(alias = "effect_interpretation")]
    pub effect_interpretation: EffectInterpretation,
    #[serde(alias = "sample_size")]
    pub sample_size: i64,
    pub conclusion: String,
}

impl HypothesisTestResult {
    fn validate(&self) -> Result<(), SchemaError> {
        if !(0.0..=1.0).contains(&self.p_value) {
            return Err(SchemaError::OutOfUnitInterval {
                field: "pValue",
                value: self.p_value,
            });
        }
        error::check_range("sampleSize", self.sample_size, 1, i64::MAX)?;
        Ok(())
    }
}

/// Aggregated results of one experiment run.
///
/// `stats_by_profile` is keyed by profile id, then by metric name
/// (`"finalScore"`, `"upperSectionScore"`, ...), mirroring the harness's
/// nested-record output. `BTreeMap` keeps report ordering deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentResults {
    #[serde(alias = "experiment_id")]
    pub experiment_id: String,
    #[serde(alias = "experiment_version")]
    pub experiment_version: String,
    #[serde(alias = "experiment_type")]
    pub experiment_type: ExperimentType,
    #[serde(alias = "started_at")]
    pub started_at: DateTime<Utc>,
    #[serde(alias = "completed_at")]
    pub completed_at: DateTime<Utc>,
    #[serde(alias = "total_games")]
    pub total_games: i64,
    #[serde(alias = "duration_ms")]
    pub duration_ms: i64,
    #[serde(alias = "master_seed")]
    pub master_seed: Option<i64>,
    #[serde(alias = "stats_by_profile")]
    pub stats_by_profile: BTreeMap<String, BTreeMap<String, ScoreStats>>,
    #[serde(alias = "hypothesis_results")]
    pub hypothesis_results: Vec<HypothesisTestResult>,
    #[serde(alias = "all_hypotheses_passed")]
    pub all_hypotheses_passed: bool,
    pub summary: String,
}

impl ExperimentResults {
    /// Checks the declarative constraints of the results document.
    pub fn validate(&self) -> Result<(), SchemaError> {
        error::check_non_negative("totalGames", self.total_games)?;
        error::check_non_negative("durationMs", self.duration_ms)?;
        for result in &self.hypothesis_results {
            result.validate()?;
        }
        Ok(())
    }

    /// Hypothesis result by identifier.
    #[must_use]
    pub fn hypothesis(&self, hypothesis_id: &str) -> Option<&HypothesisTestResult> {
        self.hypothesis_results
            .iter()
            .find(|h| h.hypothesis_id == hypothesis_id)
    }
}

/// Parses and validates an experiment results document.
pub fn parse_experiment_results(json: &str) -> Result<ExperimentResults, ParseError> {
    let results: ExperimentResults = serde_json::from_str(json)?;
    results.validate()?;
    Ok(results)
}
