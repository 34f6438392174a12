//! NDJSON loaders: lazy record iterators and materialized DataFrames.
//!
//! Two access levels are provided. [`iter_games`] / [`iter_turns`] /
//! [`iter_decisions`] stream validated records one line at a time without
//! buffering the file. [`load_games`] / [`load_turns`] / [`load_decisions`]
//! materialize a whole file into a polars [`DataFrame`], flattening nested
//! structure into flat columns.
//!
//! A malformed or schema-violating line aborts the load immediately; the
//! resulting [`LoadError`] carries the 1-based line number and the offending
//! line.

use std::{
    fs::File,
    io::{self, BufRead as _, BufReader, Lines},
    marker::PhantomData,
    path::{Path, PathBuf},
};

use dicee_schema::{Category, DecisionResult, GameResult, NdjsonRecord, ParseError, TurnResult};
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::*;

/// Failure to load an NDJSON file.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadError {
    #[display("cannot open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[display("read error: {source}")]
    Read { source: io::Error },
    #[display("line {line_no}: {source}")]
    Record {
        line_no: usize,
        line: String,
        source: ParseError,
    },
    #[display("{_0}")]
    Frame(polars::error::PolarsError),
}

impl From<polars::error::PolarsError> for LoadError {
    fn from(source: polars::error::PolarsError) -> Self {
        Self::Frame(source)
    }
}

/// Options for the materializing loaders.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Stop after this many records (games, turns, or decisions).
    pub limit: Option<usize>,
    /// Show an indicatif progress bar. Costs a line-counting pre-pass.
    pub progress: bool,
}

/// Lazy iterator over validated records of one NDJSON file.
///
/// Blank lines are skipped; every other line must parse and validate, in
/// file order.
pub struct RecordIter<T> {
    lines: Lines<BufReader<File>>,
    line_no: usize,
    _record: PhantomData<T>,
}

impl<T: NdjsonRecord> RecordIter<T> {
    fn open(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            line_no: 0,
            _record: PhantomData,
        })
    }
}

impl<T: NdjsonRecord> Iterator for RecordIter<T> {
    type Item = Result<T, LoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(source) => return Some(Err(LoadError::Read { source })),
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(T::from_json_line(&line).map_err(|source| LoadError::Record {
                line_no: self.line_no,
                line,
                source,
            }));
        }
    }
}

/// Streams validated game results from `path`.
pub fn iter_games(path: impl AsRef<Path>) -> Result<RecordIter<GameResult>, LoadError> {
    RecordIter::open(path.as_ref())
}

/// Streams validated turn results from `path`.
pub fn iter_turns(path: impl AsRef<Path>) -> Result<RecordIter<TurnResult>, LoadError> {
    RecordIter::open(path.as_ref())
}

/// Streams validated decision results from `path`.
pub fn iter_decisions(path: impl AsRef<Path>) -> Result<RecordIter<DecisionResult>, LoadError> {
    RecordIter::open(path.as_ref())
}

/// Counts non-blank lines of `path`.
fn count_lines(path: &Path) -> Result<usize, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut count = 0;
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| LoadError::Read { source })?;
        if !line.trim().is_empty() {
            count += 1;
        }
    }
    Ok(count)
}

fn progress_bar(path: &Path, options: &LoadOptions) -> Result<Option<ProgressBar>, LoadError> {
    if !options.progress {
        return Ok(None);
    }
    let total = count_lines(path)?;
    // With a record limit the bar counts toward the limit, not the file.
    let total = options.limit.map_or(total, |limit| total.min(limit));
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message(path.display().to_string());
    Ok(Some(bar))
}

fn read_records<T: NdjsonRecord>(
    path: &Path,
    options: &LoadOptions,
) -> Result<Vec<T>, LoadError> {
    let bar = progress_bar(path, options)?;
    let mut records = Vec::new();
    for record in RecordIter::<T>::open(path)? {
        records.push(record?);
        if let Some(bar) = &bar {
            bar.inc(1);
        }
        if options.limit.is_some_and(|limit| records.len() >= limit) {
            break;
        }
    }
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    log::debug!("read {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Loads game results into a DataFrame, one row per player per game.
///
/// Game-level fields (id, seed, timestamps, winner) are duplicated onto each
/// player row. Scorecard categories become nullable columns named by their
/// snake_case internal names; derived `upper_section_score` and
/// `lower_section_score` columns are appended. Timestamps are stored as
/// RFC 3339 strings.
pub fn load_games(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<DataFrame, LoadError> {
    let games: Vec<GameResult> = read_records(path.as_ref(), options)?;

    let rows = games.iter().map(|g| g.players.len()).sum();
    let mut game_id = Vec::with_capacity(rows);
    let mut seed = Vec::with_capacity(rows);
    let mut experiment_id = Vec::with_capacity(rows);
    let mut started_at = Vec::with_capacity(rows);
    let mut completed_at = Vec::with_capacity(rows);
    let mut duration_ms = Vec::with_capacity(rows);
    let mut winner_id = Vec::with_capacity(rows);
    let mut winner_profile_id = Vec::with_capacity(rows);
    let mut player_id = Vec::with_capacity(rows);
    let mut profile_id = Vec::with_capacity(rows);
    let mut final_score = Vec::with_capacity(rows);
    let mut upper_bonus = Vec::with_capacity(rows);
    let mut dicee_count = Vec::with_capacity(rows);
    let mut optimal_decisions = Vec::with_capacity(rows);
    let mut total_decisions = Vec::with_capacity(rows);
    let mut ev_loss = Vec::with_capacity(rows);
    let mut upper_section = Vec::with_capacity(rows);
    let mut lower_section = Vec::with_capacity(rows);
    let mut category_scores: Vec<Vec<Option<i64>>> =
        vec![Vec::with_capacity(rows); Category::ALL.len()];

    for game in &games {
        for player in &game.players {
            game_id.push(game.game_id.clone());
            seed.push(game.seed);
            experiment_id.push(game.experiment_id.clone());
            started_at.push(game.started_at.to_rfc3339());
            completed_at.push(game.completed_at.to_rfc3339());
            duration_ms.push(game.duration_ms);
            winner_id.push(game.winner_id.clone());
            winner_profile_id.push(game.winner_profile_id.as_str());
            player_id.push(player.id.clone());
            profile_id.push(player.profile_id.as_str());
            final_score.push(player.final_score);
            upper_bonus.push(player.upper_bonus);
            dicee_count.push(player.dicee_count);
            optimal_decisions.push(player.optimal_decisions);
            total_decisions.push(player.total_decisions);
            ev_loss.push(player.ev_loss);
            upper_section.push(player.scorecard.upper_section_score());
            lower_section.push(player.scorecard.lower_section_score());
            for (values, category) in category_scores.iter_mut().zip(Category::ALL) {
                values.push(player.scorecard.score(category));
            }
        }
    }

    let mut columns = vec![
        Column::new("game_id".into(), game_id),
        Column::new("seed".into(), seed),
        Column::new("experiment_id".into(), experiment_id),
        Column::new("started_at".into(), started_at),
        Column::new("completed_at".into(), completed_at),
        Column::new("duration_ms".into(), duration_ms),
        Column::new("winner_id".into(), winner_id),
        Column::new("winner_profile_id".into(), winner_profile_id),
        Column::new("player_id".into(), player_id),
        Column::new("profile_id".into(), profile_id),
        Column::new("final_score".into(), final_score),
        Column::new("upper_bonus".into(), upper_bonus),
        Column::new("dicee_count".into(), dicee_count),
        Column::new("optimal_decisions".into(), optimal_decisions),
        Column::new("total_decisions".into(), total_decisions),
        Column::new("ev_loss".into(), ev_loss),
        Column::new("upper_section_score".into(), upper_section),
        Column::new("lower_section_score".into(), lower_section),
    ];
    for (values, category) in category_scores.into_iter().zip(Category::ALL) {
        columns.push(Column::new(category.as_str().into(), values));
    }
    Ok(DataFrame::new(columns)?)
}

/// Loads turn results into a DataFrame, one row per turn.
///
/// The five final dice become `die_1`..`die_5` columns.
pub fn load_turns(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<DataFrame, LoadError> {
    let turns: Vec<TurnResult> = read_records(path.as_ref(), options)?;

    let rows = turns.len();
    let mut turn_id = Vec::with_capacity(rows);
    let mut game_id = Vec::with_capacity(rows);
    let mut player_id = Vec::with_capacity(rows);
    let mut profile_id = Vec::with_capacity(rows);
    let mut turn_number = Vec::with_capacity(rows);
    let mut roll_count = Vec::with_capacity(rows);
    let mut dice: Vec<Vec<i64>> = vec![Vec::with_capacity(rows); 5];
    let mut scored_category = Vec::with_capacity(rows);
    let mut scored_points = Vec::with_capacity(rows);
    let mut optimal_category = Vec::with_capacity(rows);
    let mut optimal_points = Vec::with_capacity(rows);
    let mut ev_difference = Vec::with_capacity(rows);
    let mut was_optimal = Vec::with_capacity(rows);

    for turn in &turns {
        turn_id.push(turn.turn_id.clone());
        game_id.push(turn.game_id.clone());
        player_id.push(turn.player_id.clone());
        profile_id.push(turn.profile_id.as_str());
        turn_number.push(turn.turn_number);
        roll_count.push(turn.roll_count);
        for (values, face) in dice.iter_mut().zip(turn.final_dice) {
            values.push(i64::from(face));
        }
        scored_category.push(turn.scored_category.as_str());
        scored_points.push(turn.scored_points);
        optimal_category.push(turn.optimal_category.map(Category::as_str));
        optimal_points.push(turn.optimal_points);
        ev_difference.push(turn.ev_difference);
        was_optimal.push(turn.was_optimal);
    }

    let mut columns = vec![
        Column::new("turn_id".into(), turn_id),
        Column::new("game_id".into(), game_id),
        Column::new("player_id".into(), player_id),
        Column::new("profile_id".into(), profile_id),
        Column::new("turn_number".into(), turn_number),
        Column::new("roll_count".into(), roll_count),
    ];
    for (i, values) in dice.into_iter().enumerate() {
        columns.push(Column::new(format!("die_{}", i + 1).into(), values));
    }
    columns.extend([
        Column::new("scored_category".into(), scored_category),
        Column::new("scored_points".into(), scored_points),
        Column::new("optimal_category".into(), optimal_category),
        Column::new("optimal_points".into(), optimal_points),
        Column::new("ev_difference".into(), ev_difference),
        Column::new("was_optimal".into(), was_optimal),
    ]);
    Ok(DataFrame::new(columns)?)
}

/// Loads decision results into a DataFrame, one row per decision.
///
/// Dice tuples become `before_1`..`before_5` and `after_1`..`after_5`
/// columns; the kept mask becomes `kept_1`..`kept_5` boolean columns.
pub fn load_decisions(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<DataFrame, LoadError> {
    let decisions: Vec<DecisionResult> = read_records(path.as_ref(), options)?;

    let rows = decisions.len();
    let mut decision_id = Vec::with_capacity(rows);
    let mut turn_id = Vec::with_capacity(rows);
    let mut game_id = Vec::with_capacity(rows);
    let mut player_id = Vec::with_capacity(rows);
    let mut roll_number = Vec::with_capacity(rows);
    let mut before: Vec<Vec<i64>> = vec![Vec::with_capacity(rows); 5];
    let mut after: Vec<Vec<i64>> = vec![Vec::with_capacity(rows); 5];
    let mut kept: Vec<Vec<bool>> = vec![Vec::with_capacity(rows); 5];
    let mut was_optimal_hold = Vec::with_capacity(rows);
    let mut ev_loss = Vec::with_capacity(rows);

    for decision in &decisions {
        decision_id.push(decision.decision_id.clone());
        turn_id.push(decision.turn_id.clone());
        game_id.push(decision.game_id.clone());
        player_id.push(decision.player_id.clone());
        roll_number.push(decision.roll_number);
        for (values, face) in before.iter_mut().zip(decision.dice_before) {
            values.push(i64::from(face));
        }
        for (values, face) in after.iter_mut().zip(decision.dice_after) {
            values.push(i64::from(face));
        }
        for (values, flag) in kept.iter_mut().zip(decision.kept_mask) {
            values.push(flag);
        }
        was_optimal_hold.push(decision.was_optimal_hold);
        ev_loss.push(decision.ev_loss);
    }

    let mut columns = vec![
        Column::new("decision_id".into(), decision_id),
        Column::new("turn_id".into(), turn_id),
        Column::new("game_id".into(), game_id),
        Column::new("player_id".into(), player_id),
        Column::new("roll_number".into(), roll_number),
    ];
    for (i, values) in before.into_iter().enumerate() {
        columns.push(Column::new(format!("before_{}", i + 1).into(), values));
    }
    for (i, values) in after.into_iter().enumerate() {
        columns.push(Column::new(format!("after_{}", i + 1).into(), values));
    }
    for (i, values) in kept.into_iter().enumerate() {
        columns.push(Column::new(format!("kept_{}", i + 1).into(), values));
    }
    columns.extend([
        Column::new("was_optimal_hold".into(), was_optimal_hold),
        Column::new("ev_loss".into(), ev_loss),
    ]);
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{game_line, two_player_game_line, write_ndjson};

    #[test]
    fn test_load_games_one_row_per_player() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_ndjson(
            dir.path(),
            "games.ndjson",
            &[two_player_game_line("g-1", "professor", 310, "carmen", 280)],
        );
        let frame = load_games(&path, &LoadOptions::default()).unwrap();
        assert_eq!(frame.height(), 2);

        // Game-level fields repeat on each player row.
        let winners = frame.column("winner_profile_id").unwrap().str().unwrap();
        assert_eq!(winners.get(0), Some("professor"));
        assert_eq!(winners.get(1), Some("professor"));
        let bonus = frame.column("upper_bonus").unwrap().bool().unwrap();
        assert_eq!(bonus.get(0), Some(false));
        assert_eq!(bonus.get(1), Some(true));
    }

    #[test]
    fn test_iter_games_streams_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_ndjson(
            dir.path(),
            "games.ndjson",
            &[
                game_line("g-1", "professor", 310, 18),
                String::new(),
                game_line("g-2", "carmen", 280, 12),
            ],
        );
        let games: Vec<GameResult> = iter_games(&path)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].game_id, "g-1");
        assert_eq!(games[1].game_id, "g-2");
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_ndjson(
            dir.path(),
            "games.ndjson",
            &[
                game_line("g-1", "professor", 310, 18),
                "{not json".to_string(),
            ],
        );
        let err = iter_games(&path)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap_err();
        match err {
            LoadError::Record { line_no, line, .. } => {
                assert_eq!(line_no, 2);
                assert_eq!(line, "{not json");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_games_flattens_players_and_scorecard() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_ndjson(
            dir.path(),
            "games.ndjson",
            &[
                game_line("g-1", "professor", 310, 18),
                game_line("g-2", "carmen", 280, 12),
            ],
        );
        let frame = load_games(&path, &LoadOptions::default()).unwrap();
        assert_eq!(frame.height(), 2);

        let profiles = frame.column("profile_id").unwrap().str().unwrap();
        assert_eq!(profiles.get(0), Some("professor"));
        assert_eq!(profiles.get(1), Some("carmen"));

        let sixes = frame.column("sixes").unwrap().i64().unwrap();
        assert_eq!(sixes.get(0), Some(18));
        let ones = frame.column("ones").unwrap().i64().unwrap();
        assert_eq!(ones.get(0), None);

        let upper = frame.column("upper_section_score").unwrap().i64().unwrap();
        assert_eq!(upper.get(0), Some(18));
        let lower = frame.column("lower_section_score").unwrap().i64().unwrap();
        assert_eq!(lower.get(0), Some(50));
    }

    #[test]
    fn test_load_games_respects_limit() {
        let dir = tempfile::tempdir().unwrap();
        let lines: Vec<String> = (0..5)
            .map(|i| game_line(&format!("g-{i}"), "riley", 200 + i, 6))
            .collect();
        let path = write_ndjson(dir.path(), "games.ndjson", &lines);
        let frame = load_games(
            &path,
            &LoadOptions {
                limit: Some(3),
                progress: false,
            },
        )
        .unwrap();
        assert_eq!(frame.height(), 3);
    }

    #[test]
    fn test_progress_bar_total_capped_at_limit() {
        let dir = tempfile::tempdir().unwrap();
        let lines: Vec<String> = (0..5)
            .map(|i| game_line(&format!("g-{i}"), "riley", 200 + i, 6))
            .collect();
        let path = write_ndjson(dir.path(), "games.ndjson", &lines);

        let options = LoadOptions {
            limit: Some(2),
            progress: true,
        };
        let bar = progress_bar(&path, &options).unwrap().unwrap();
        assert_eq!(bar.length(), Some(2));

        let options = LoadOptions {
            limit: None,
            progress: true,
        };
        let bar = progress_bar(&path, &options).unwrap().unwrap();
        assert_eq!(bar.length(), Some(5));
    }

    #[test]
    fn test_load_turns_splits_dice_into_columns() {
        let dir = tempfile::tempdir().unwrap();
        let line = concat!(
            r#"{"turnId": "t-1", "gameId": "g-1", "playerId": "p-1", "#,
            r#""profileId": "liam", "turnNumber": 1, "rollCount": 3, "#,
            r#""finalDice": [2, 4, 6, 6, 1], "scoredCategory": "sixes", "#,
            r#""scoredPoints": 12}"#,
        );
        let path = write_ndjson(dir.path(), "turns.ndjson", &[line.to_string()]);
        let frame = load_turns(&path, &LoadOptions::default()).unwrap();
        assert_eq!(frame.height(), 1);
        assert_eq!(
            frame.column("die_3").unwrap().i64().unwrap().get(0),
            Some(6)
        );
        assert_eq!(
            frame.column("scored_category").unwrap().str().unwrap().get(0),
            Some("sixes")
        );
        assert_eq!(
            frame.column("optimal_category").unwrap().str().unwrap().get(0),
            None
        );
    }

    #[test]
    fn test_load_decisions_splits_mask_into_columns() {
        let dir = tempfile::tempdir().unwrap();
        let line = concat!(
            r#"{"decisionId": "d-1", "turnId": "t-1", "gameId": "g-1", "#,
            r#""playerId": "p-1", "rollNumber": 2, "#,
            r#""diceBefore": [1, 2, 3, 4, 5], "diceAfter": [6, 2, 3, 4, 5], "#,
            r#""keptMask": [false, true, true, true, true]}"#,
        );
        let path = write_ndjson(dir.path(), "decisions.ndjson", &[line.to_string()]);
        let frame = load_decisions(&path, &LoadOptions::default()).unwrap();
        assert_eq!(frame.height(), 1);
        assert_eq!(
            frame.column("kept_1").unwrap().bool().unwrap().get(0),
            Some(false)
        );
        assert_eq!(
            frame.column("after_1").unwrap().i64().unwrap().get(0),
            Some(6)
        );
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let err = load_games("/nonexistent/games.ndjson", &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }
}
