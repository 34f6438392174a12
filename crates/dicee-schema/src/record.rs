//! Game, turn, and decision result records.
//!
//! One record corresponds to one line of the producer's NDJSON output.
//! Deserialization accepts both camelCase and snake_case spellings;
//! serialization re-emits camelCase for interchange with the TypeScript
//! side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    category::Category,
    error::{self, ParseError, SchemaError},
    profile::ProfileId,
    scorecard::Scorecard,
};

/// A record kind that can be parsed from one NDJSON line.
///
/// `from_json_line` combines serde deserialization with the declarative
/// constraint checks of [`validate`](Self::validate); loaders should only
/// ever construct records through it.
pub trait NdjsonRecord: DeserializeOwned {
    /// Checks the declarative range/shape constraints of the wire schema.
    fn validate(&self) -> Result<(), SchemaError>;

    /// Parses and validates a single NDJSON line.
    fn from_json_line(line: &str) -> Result<Self, ParseError> {
        let record: Self = serde_json::from_str(line)?;
        record.validate()?;
        Ok(record)
    }
}

/// Result for a single player within a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResult {
    pub id: String,
    #[serde(alias = "profile_id")]
    pub profile_id: ProfileId,
    #[serde(alias = "final_score")]
    pub final_score: i64,
    pub scorecard: Scorecard,
    #[serde(alias = "upper_bonus")]
    pub upper_bonus: bool,
    #[serde(alias = "dicee_count")]
    pub dicee_count: i64,
    #[serde(alias = "optimal_decisions")]
    pub optimal_decisions: Option<i64>,
    #[serde(alias = "total_decisions")]
    pub total_decisions: Option<i64>,
    #[serde(alias = "ev_loss")]
    pub ev_loss: Option<f64>,
}

impl PlayerResult {
    fn validate(&self) -> Result<(), SchemaError> {
        error::check_non_negative("finalScore", self.final_score)?;
        error::check_non_negative("diceeCount", self.dicee_count)?;
        if let Some(value) = self.optimal_decisions {
            error::check_non_negative("optimalDecisions", value)?;
        }
        if let Some(value) = self.total_decisions {
            error::check_non_negative("totalDecisions", value)?;
        }
        self.scorecard.validate()
    }
}

/// Complete result for a single game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    #[serde(alias = "game_id")]
    pub game_id: String,
    pub seed: i64,
    #[serde(alias = "experiment_id")]
    pub experiment_id: Option<String>,
    #[serde(alias = "started_at")]
    pub started_at: DateTime<Utc>,
    #[serde(alias = "completed_at")]
    pub completed_at: DateTime<Utc>,
    #[serde(alias = "duration_ms")]
    pub duration_ms: i64,
    pub players: Vec<PlayerResult>,
    #[serde(alias = "winner_id")]
    pub winner_id: String,
    #[serde(alias = "winner_profile_id")]
    pub winner_profile_id: ProfileId,
}

impl GameResult {
    /// Looks up a player result by player identifier.
    #[must_use]
    pub fn player(&self, player_id: &str) -> Option<&PlayerResult> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// Looks up a player result by profile identifier.
    #[must_use]
    pub fn player_by_profile(&self, profile_id: ProfileId) -> Option<&PlayerResult> {
        self.players.iter().find(|p| p.profile_id == profile_id)
    }
}

impl NdjsonRecord for GameResult {
    fn validate(&self) -> Result<(), SchemaError> {
        error::check_non_negative("durationMs", self.duration_ms)?;
        if self.players.is_empty() {
            return Err(SchemaError::NoPlayers {
                game_id: self.game_id.clone(),
            });
        }
        if self.player(&self.winner_id).is_none() {
            return Err(SchemaError::UnknownWinner {
                game_id: self.game_id.clone(),
                winner_id: self.winner_id.clone(),
            });
        }
        for player in &self.players {
            player.validate()?;
        }
        Ok(())
    }
}

/// Result for a single turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnResult {
    #[serde(alias = "turn_id")]
    pub turn_id: String,
    #[serde(alias = "game_id")]
    pub game_id: String,
    #[serde(alias = "player_id")]
    pub player_id: String,
    #[serde(alias = "profile_id")]
    pub profile_id: ProfileId,
    #[serde(alias = "turn_number")]
    pub turn_number: i64,
    #[serde(alias = "roll_count")]
    pub roll_count: i64,
    #[serde(alias = "final_dice")]
    pub final_dice: [u8; 5],
    #[serde(alias = "scored_category")]
    pub scored_category: Category,
    #[serde(alias = "scored_points")]
    pub scored_points: i64,
    #[serde(alias = "optimal_category")]
    pub optimal_category: Option<Category>,
    #[serde(alias = "optimal_points")]
    pub optimal_points: Option<i64>,
    #[serde(alias = "ev_difference")]
    pub ev_difference: Option<f64>,
    #[serde(alias = "was_optimal")]
    pub was_optimal: Option<bool>,
}

impl NdjsonRecord for TurnResult {
    fn validate(&self) -> Result<(), SchemaError> {
        error::check_range("turnNumber", self.turn_number, 1, 13)?;
        error::check_range("rollCount", self.roll_count, 1, 3)?;
        error::check_dice("finalDice", self.final_dice)?;
        error::check_non_negative("scoredPoints", self.scored_points)?;
        if let Some(value) = self.optimal_points {
            error::check_non_negative("optimalPoints", value)?;
        }
        Ok(())
    }
}

/// Result for a single dice-keeping decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResult {
    #[serde(alias = "decision_id")]
    pub decision_id: String,
    #[serde(alias = "turn_id")]
    pub turn_id: String,
    #[serde(alias = "game_id")]
    pub game_id: String,
    #[serde(alias = "player_id")]
    pub player_id: String,
    #[serde(alias = "roll_number")]
    pub roll_number: i64,
    #[serde(alias = "dice_before")]
    pub dice_before: [u8; 5],
    #[serde(alias = "dice_after")]
    pub dice_after: [u8; 5],
    #[serde(alias = "kept_mask")]
    pub kept_mask: [bool; 5],
    #[serde(alias = "was_optimal_hold")]
    pub was_optimal_hold: Option<bool>,
    #[serde(alias = "ev_loss")]
    pub ev_loss: Option<f64>,
}

impl NdjsonRecord for DecisionResult {
    fn validate(&self) -> Result<(), SchemaError> {
        error::check_range("rollNumber", self.roll_number, 1, 3)?;
        error::check_dice("diceBefore", self.dice_before)?;
        error::check_dice("diceAfter", self.dice_after)?;
        Ok(())
    }
}

/// Parses and validates a game result line.
pub fn parse_game_result(line: &str) -> Result<GameResult, ParseError> {
    GameResult::from_json_line(line)
}

/// Parses and validates a turn result line.
pub fn parse_turn_result(line: &str) -> Result<TurnResult, ParseError> {
    TurnResult::from_json_line(line)
}

/// Parses and validates a decision result line.
pub fn parse_decision_result(line: &str) -> Result<DecisionResult, ParseError> {
    DecisionResult::from_json_line(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_GAME: &str = r#"{
        "gameId": "550e8400-e29b-41d4-a716-446655440000",
        "seed": 42,
        "experimentId": "calibration_v1",
        "startedAt": "2024-12-10T10:00:00.000Z",
        "completedAt": "2024-12-10T10:00:05.123Z",
        "durationMs": 5123,
        "players": [{
            "id": "player-1",
            "profileId": "professor",
            "finalScore": 312,
            "scorecard": {
                "ones": 3, "twos": 6, "threes": 9, "fours": 12,
                "fives": 15, "sixes": 18, "threeOfAKind": 25,
                "fourOfAKind": 28, "fullHouse": 25, "smallStraight": 30,
                "largeStraight": 40, "dicee": 50, "chance": 23
            },
            "upperBonus": true,
            "diceeCount": 1,
            "optimalDecisions": 35,
            "totalDecisions": 39,
            "evLoss": 4.2
        }],
        "winnerId": "player-1",
        "winnerProfileId": "professor"
    }"#;

    const VALID_TURN: &str = r#"{
        "turnId": "t-1", "gameId": "g-1", "playerId": "p-1",
        "profileId": "carmen", "turnNumber": 4, "rollCount": 2,
        "finalDice": [3, 3, 3, 5, 6], "scoredCategory": "threeOfAKind",
        "scoredPoints": 20, "optimalCategory": "threes",
        "optimalPoints": 9, "evDifference": -1.5, "wasOptimal": false
    }"#;

    const VALID_DECISION: &str = r#"{
        "decisionId": "d-1", "turnId": "t-1", "gameId": "g-1",
        "playerId": "p-1", "rollNumber": 1,
        "diceBefore": [1, 2, 3, 4, 5], "diceAfter": [6, 2, 3, 4, 5],
        "keptMask": [false, true, true, true, true],
        "wasOptimalHold": true, "evLoss": 0.0
    }"#;

    #[test]
    fn test_parse_valid_game() {
        let game = parse_game_result(VALID_GAME).unwrap();
        assert_eq!(game.seed, 42);
        assert_eq!(game.players.len(), 1);
        assert_eq!(game.players[0].profile_id, ProfileId::Professor);
        assert_eq!(game.players[0].scorecard.upper_section_score(), 63);
        assert!(game.player("player-1").is_some());
        assert!(game.player_by_profile(ProfileId::Carmen).is_none());
    }

    #[test]
    fn test_round_trip_preserves_camel_case_and_values() {
        let game = parse_game_result(VALID_GAME).unwrap();
        let json = serde_json::to_string(&game).unwrap();
        for field in [
            "\"gameId\"",
            "\"experimentId\"",
            "\"startedAt\"",
            "\"durationMs\"",
            "\"winnerProfileId\"",
            "\"finalScore\"",
            "\"upperBonus\"",
            "\"threeOfAKind\"",
        ] {
            assert!(json.contains(field), "missing {field} in {json}");
        }
        let reparsed = parse_game_result(&json).unwrap();
        assert_eq!(reparsed, game);
        assert_eq!(reparsed.players[0].scorecard.chance, Some(23));
    }

    #[test]
    fn test_snake_case_input_is_accepted() {
        let snake = r#"{
            "game_id": "g-1", "seed": 7, "started_at": "2024-12-10T10:00:00Z",
            "completed_at": "2024-12-10T10:00:01Z", "duration_ms": 1000,
            "players": [{
                "id": "p-1", "profile_id": "riley", "final_score": 150,
                "scorecard": {}, "upper_bonus": false, "dicee_count": 0
            }],
            "winner_id": "p-1", "winner_profile_id": "riley"
        }"#;
        let game = parse_game_result(snake).unwrap();
        assert_eq!(game.game_id, "g-1");
        assert_eq!(game.duration_ms, 1000);
    }

    #[test]
    fn test_unknown_winner_is_rejected() {
        let line = VALID_GAME.replace("\"winnerId\": \"player-1\"", "\"winnerId\": \"player-9\"");
        assert!(matches!(
            parse_game_result(&line),
            Err(ParseError::Schema(SchemaError::UnknownWinner { .. }))
        ));
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let line = VALID_GAME.replace("\"durationMs\": 5123", "\"durationMs\": -1");
        assert!(matches!(
            parse_game_result(&line),
            Err(ParseError::Schema(SchemaError::Negative {
                field: "durationMs",
                value: -1
            }))
        ));
    }

    #[test]
    fn test_parse_valid_turn() {
        let turn = parse_turn_result(VALID_TURN).unwrap();
        assert_eq!(turn.turn_number, 4);
        assert_eq!(turn.scored_category, Category::ThreeOfAKind);
        assert_eq!(turn.final_dice, [3, 3, 3, 5, 6]);
    }

    #[test]
    fn test_turn_number_out_of_range() {
        let line = VALID_TURN.replace("\"turnNumber\": 4", "\"turnNumber\": 14");
        assert!(matches!(
            parse_turn_result(&line),
            Err(ParseError::Schema(SchemaError::OutOfRange {
                field: "turnNumber",
                value: 14,
                min: 1,
                max: 13
            }))
        ));
    }

    #[test]
    fn test_die_face_out_of_range() {
        let line = VALID_TURN.replace("[3, 3, 3, 5, 6]", "[3, 3, 3, 5, 7]");
        assert!(matches!(
            parse_turn_result(&line),
            Err(ParseError::Schema(SchemaError::InvalidDieFace {
                field: "finalDice",
                value: 7
            }))
        ));
    }

    #[test]
    fn test_wrong_dice_arity_is_malformed_json() {
        let line = VALID_TURN.replace("[3, 3, 3, 5, 6]", "[3, 3, 3, 5]");
        assert!(matches!(
            parse_turn_result(&line),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn test_parse_valid_decision() {
        let decision = parse_decision_result(VALID_DECISION).unwrap();
        assert_eq!(decision.roll_number, 1);
        assert_eq!(decision.kept_mask, [false, true, true, true, true]);
        assert_eq!(decision.was_optimal_hold, Some(true));
    }

    #[test]
    fn test_roll_number_out_of_range() {
        let line = VALID_DECISION.replace("\"rollNumber\": 1", "\"rollNumber\": 4");
        assert!(matches!(
            parse_decision_result(&line),
            Err(ParseError::Schema(SchemaError::OutOfRange {
                field: "rollNumber",
                ..
            }))
        ));
    }
}
