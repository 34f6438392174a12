//! DataFrame-level descriptive statistics and per-profile aggregates.

use std::collections::BTreeMap;

use dicee_schema::{Category, ProfileId};
use dicee_stats::{descriptive::ScoreStats, hypothesis::TestError};
use polars::prelude::*;

/// Failure during a DataFrame analysis operation.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum AnalysisError {
    #[display("no rows for profile `{profile}`")]
    #[from(skip)]
    NoData { profile: ProfileId },
    #[display("{_0}")]
    Test(TestError),
    #[display("{_0}")]
    Frame(polars::error::PolarsError),
}

/// Non-null values of a numeric column, cast to f64.
pub(crate) fn column_values(
    frame: &DataFrame,
    name: &str,
) -> Result<Vec<f64>, AnalysisError> {
    let column = frame.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().flatten().collect())
}

/// Rows of `frame` belonging to one profile.
pub(crate) fn filter_profile(
    frame: &DataFrame,
    profile: ProfileId,
) -> Result<DataFrame, AnalysisError> {
    let mask = frame.column("profile_id")?.str()?.equal(profile.as_str());
    Ok(frame.filter(&mask)?)
}

/// Summary statistics over one numeric column.
pub fn describe_scores(frame: &DataFrame, column: &str) -> Result<ScoreStats, AnalysisError> {
    Ok(ScoreStats::from_values(&column_values(frame, column)?))
}

/// Summary statistics over one numeric column, grouped by profile.
///
/// Keys are the profile strings found in the `profile_id` column, in sorted
/// order.
pub fn describe_scores_by_profile(
    frame: &DataFrame,
    column: &str,
) -> Result<BTreeMap<String, ScoreStats>, AnalysisError> {
    let profiles = frame.column("profile_id")?.str()?.clone();
    let names: std::collections::BTreeSet<String> = profiles
        .into_iter()
        .flatten()
        .map(str::to_owned)
        .collect();

    let mut stats = BTreeMap::new();
    for name in names {
        let mask = frame.column("profile_id")?.str()?.equal(name.as_str());
        let subset = frame.filter(&mask)?;
        stats.insert(name, describe_scores(&subset, column)?);
    }
    Ok(stats)
}

/// Per-category summary statistics over the flattened games frame.
///
/// Only non-null cells count; categories with no recorded scores are
/// omitted. An optional `profile` restricts the rows first.
pub fn describe_by_category(
    frame: &DataFrame,
    profile: Option<ProfileId>,
) -> Result<BTreeMap<Category, ScoreStats>, AnalysisError> {
    let frame = match profile {
        Some(profile) => filter_profile(frame, profile)?,
        None => frame.clone(),
    };

    let mut stats = BTreeMap::new();
    for category in Category::ALL {
        // Frames converted by older tool versions may lack some columns.
        if frame.column(category.as_str()).is_err() {
            continue;
        }
        let values = column_values(&frame, category.as_str())?;
        if values.is_empty() {
            continue;
        }
        stats.insert(category, ScoreStats::from_values(&values));
    }
    Ok(stats)
}

/// Win count and rate for one profile.
#[derive(Debug, Clone, PartialEq)]
pub struct WinRate {
    pub profile_id: String,
    pub wins: usize,
    pub games: usize,
    pub win_rate: f64,
}

/// Upper-bonus count and rate for one profile.
#[derive(Debug, Clone, PartialEq)]
pub struct BonusRate {
    pub profile_id: String,
    pub bonuses: usize,
    pub games: usize,
    pub bonus_rate: f64,
}

/// Per-profile win rates over the flattened games frame.
///
/// A player row counts as a win when its `profile_id` equals the game's
/// `winner_profile_id`, so in a mirror match every row carrying the
/// winning profile counts. Profiles that never won still appear with
/// rate 0. Results are sorted by descending rate, then by profile name.
#[expect(clippy::cast_precision_loss)]
pub fn calculate_win_rates(frame: &DataFrame) -> Result<Vec<WinRate>, AnalysisError> {
    let profiles = frame.column("profile_id")?.str()?.clone();
    let winners = frame.column("winner_profile_id")?.str()?.clone();

    let mut tally: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for (profile, winner) in profiles.into_iter().zip(winners.into_iter()) {
        let (Some(profile), Some(winner)) = (profile, winner) else {
            continue;
        };
        let entry = tally.entry(profile.to_owned()).or_insert((0, 0));
        entry.1 += 1;
        if profile == winner {
            entry.0 += 1;
        }
    }

    let mut rates: Vec<WinRate> = tally
        .into_iter()
        .map(|(profile_id, (wins, games))| WinRate {
            profile_id,
            wins,
            games,
            win_rate: if games == 0 {
                0.0
            } else {
                wins as f64 / games as f64
            },
        })
        .collect();
    rates.sort_by(|a, b| {
        b.win_rate
            .total_cmp(&a.win_rate)
            .then_with(|| a.profile_id.cmp(&b.profile_id))
    });
    Ok(rates)
}

/// Per-profile upper-bonus rates over the flattened games frame.
///
/// Sorted by descending rate, then by profile name.
#[expect(clippy::cast_precision_loss)]
pub fn calculate_bonus_rates(frame: &DataFrame) -> Result<Vec<BonusRate>, AnalysisError> {
    let profiles = frame.column("profile_id")?.str()?.clone();
    let bonuses = frame.column("upper_bonus")?.bool()?.clone();

    let mut tally: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for (profile, bonus) in profiles.into_iter().zip(bonuses.into_iter()) {
        let (Some(profile), Some(bonus)) = (profile, bonus) else {
            continue;
        };
        let entry = tally.entry(profile.to_owned()).or_insert((0, 0));
        entry.1 += 1;
        if bonus {
            entry.0 += 1;
        }
    }

    let mut rates: Vec<BonusRate> = tally
        .into_iter()
        .map(|(profile_id, (bonuses, games))| BonusRate {
            profile_id,
            bonuses,
            games,
            bonus_rate: if games == 0 {
                0.0
            } else {
                bonuses as f64 / games as f64
            },
        })
        .collect();
    rates.sort_by(|a, b| {
        b.bonus_rate
            .total_cmp(&a.bonus_rate)
            .then_with(|| a.profile_id.cmp(&b.profile_id))
    });
    Ok(rates)
}
