//! Shared fixtures for unit tests.

use std::{
    fs::File,
    io::Write as _,
    path::{Path, PathBuf},
};

/// One single-player game line with a two-entry scorecard (sixes + dicee).
pub(crate) fn game_line(game_id: &str, profile: &str, score: i64, sixes: i64) -> String {
    format!(
        concat!(
            r#"{{"gameId": "{id}", "seed": 1, "startedAt": "2024-12-10T10:00:00Z", "#,
            r#""completedAt": "2024-12-10T10:00:01Z", "durationMs": 1000, "#,
            r#""players": [{{"id": "p-1", "profileId": "{profile}", "finalScore": {score}, "#,
            r#""scorecard": {{"sixes": {sixes}, "dicee": 50}}, "upperBonus": false, "#,
            r#""diceeCount": 0}}], "winnerId": "p-1", "winnerProfileId": "{profile}"}}"#,
        ),
        id = game_id,
        profile = profile,
        score = score,
        sixes = sixes,
    )
}

/// A two-player game line; `winner` selects which player id wins.
pub(crate) fn two_player_game_line(
    game_id: &str,
    profile_a: &str,
    score_a: i64,
    profile_b: &str,
    score_b: i64,
) -> String {
    let winner_profile = if score_a >= score_b { profile_a } else { profile_b };
    let winner_id = if score_a >= score_b { "p-a" } else { "p-b" };
    format!(
        concat!(
            r#"{{"gameId": "{id}", "seed": 1, "startedAt": "2024-12-10T10:00:00Z", "#,
            r#""completedAt": "2024-12-10T10:00:01Z", "durationMs": 1000, "players": ["#,
            r#"{{"id": "p-a", "profileId": "{pa}", "finalScore": {sa}, "#,
            r#""scorecard": {{"sixes": 18}}, "upperBonus": false, "diceeCount": 0}}, "#,
            r#"{{"id": "p-b", "profileId": "{pb}", "finalScore": {sb}, "#,
            r#""scorecard": {{"sixes": 12}}, "upperBonus": true, "diceeCount": 0}}"#,
            r#"], "winnerId": "{wid}", "winnerProfileId": "{wp}"}}"#,
        ),
        id = game_id,
        pa = profile_a,
        sa = score_a,
        pb = profile_b,
        sb = score_b,
        wid = winner_id,
        wp = winner_profile,
    )
}

/// Writes `lines` to `dir/name`, one per line, and returns the path.
pub(crate) fn write_ndjson(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    path
}
