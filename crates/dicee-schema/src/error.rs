//! Validation and parse errors for wire records.

/// A declarative constraint of the wire schema was violated.
///
/// Every variant names the offending field so that a malformed producer
/// record can be traced back to its source.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SchemaError {
    #[display("field `{field}`: value {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[display("field `{field}`: value {value} must be non-negative")]
    Negative { field: &'static str, value: i64 },
    #[display("field `{field}`: value {value} is outside the unit interval")]
    OutOfUnitInterval { field: &'static str, value: f64 },
    #[display("field `{field}`: die face {value} is outside 1..=6")]
    InvalidDieFace { field: &'static str, value: u8 },
    #[display("game `{game_id}` has no players")]
    NoPlayers { game_id: String },
    #[display("game `{game_id}`: winner `{winner_id}` does not match any player")]
    UnknownWinner { game_id: String, winner_id: String },
}

/// Failure to turn one line of NDJSON into a validated record.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ParseError {
    #[display("malformed JSON: {_0}")]
    Json(serde_json::Error),
    #[display("{_0}")]
    Schema(SchemaError),
}

pub(crate) fn check_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), SchemaError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(SchemaError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

pub(crate) fn check_non_negative(field: &'static str, value: i64) -> Result<(), SchemaError> {
    if value >= 0 {
        Ok(())
    } else {
        Err(SchemaError::Negative { field, value })
    }
}

pub(crate) fn check_dice(field: &'static str, dice: [u8; 5]) -> Result<(), SchemaError> {
    for value in dice {
        if !(1..=6).contains(&value) {
            return Err(SchemaError::InvalidDieFace { field, value });
        }
    }
    Ok(())
}
