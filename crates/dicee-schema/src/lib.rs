//! Typed records mirroring the Dicee simulator's TypeScript schemas.
//!
//! The external simulation system emits newline-delimited JSON with
//! camelCase field names. This crate defines the matching Rust records,
//! accepts either the camelCase wire spelling or the snake_case internal
//! spelling on input, re-emits camelCase on output, and applies the
//! declarative range/enum/shape constraints of the producer's schema.
//!
//! This is the compatibility-critical boundary of the toolkit: external
//! consumers depend on byte-identical field spellings, so the serde
//! attributes here must track the TypeScript definitions exactly.
//!
//! # Modules
//!
//! - [`category`]: The 13 scorecard categories
//! - [`profile`]: AI profile identifiers
//! - [`scorecard`]: Scorecard state with derived section totals
//! - [`record`]: Game, turn, and decision result records
//! - [`experiment`]: Experiment definitions and aggregated results
//! - [`error`]: Validation and parse errors
//!
//! # Examples
//!
//! ```
//! use dicee_schema::record::{GameResult, NdjsonRecord as _};
//!
//! let line = r#"{
//!     "gameId": "g-1", "seed": 42, "startedAt": "2024-12-10T10:00:00Z",
//!     "completedAt": "2024-12-10T10:00:05Z", "durationMs": 5000,
//!     "players": [{
//!         "id": "p-1", "profileId": "professor", "finalScore": 312,
//!         "scorecard": {"ones": 3, "dicee": 50}, "upperBonus": false,
//!         "diceeCount": 1
//!     }],
//!     "winnerId": "p-1", "winnerProfileId": "professor"
//! }"#;
//! let game = GameResult::from_json_line(line).unwrap();
//! assert_eq!(game.winner_id, "p-1");
//! ```

pub mod category;
pub mod error;
pub mod experiment;
pub mod profile;
pub mod record;
pub mod scorecard;

pub use self::{
    category::Category,
    error::{ParseError, SchemaError},
    profile::ProfileId,
    record::{DecisionResult, GameResult, NdjsonRecord, PlayerResult, TurnResult},
    scorecard::Scorecard,
};
