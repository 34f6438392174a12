//! NDJSON ingestion, Parquet conversion, and DataFrame statistics for
//! Dicee simulation results.
//!
//! The pipeline has three stages:
//!
//! 1. [`loader`]: stream or materialize validated records from the
//!    simulator's NDJSON output
//! 2. [`convert`]: persist the flattened DataFrames as Parquet
//! 3. [`score_stats`] / [`compare`]: descriptive statistics, per-profile
//!    aggregates, and hypothesis-test comparisons over the frames
//!
//! # Examples
//!
//! ```no_run
//! use dicee_analysis::{LoadOptions, load_games, describe_scores};
//!
//! let frame = load_games("results/games.ndjson", &LoadOptions::default())?;
//! let stats = describe_scores(&frame, "final_score")?;
//! println!("mean score: {:.1}", stats.mean);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod compare;
pub mod convert;
pub mod loader;
pub mod score_stats;
#[cfg(test)]
mod test_support;

pub use self::{
    compare::{TestMethod, compare_profiles, profile_scores, test_calibration},
    convert::{
        Compression, ConvertError, RecordKind, convert_dir, decisions_to_parquet,
        games_to_parquet, load_parquet, turns_to_parquet,
    },
    loader::{
        LoadError, LoadOptions, RecordIter, iter_decisions, iter_games, iter_turns,
        load_decisions, load_games, load_turns,
    },
    score_stats::{
        AnalysisError, BonusRate, WinRate, calculate_bonus_rates, calculate_win_rates,
        describe_by_category, describe_scores, describe_scores_by_profile,
    },
};
