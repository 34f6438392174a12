//! Scorecard categories.

use serde::{Deserialize, Serialize};

/// The 13 scoring categories of a game.
///
/// Wire values are camelCase (`"threeOfAKind"`); [`Category::as_str`] gives
/// the snake_case internal name used for DataFrame columns.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    #[display("ones")]
    Ones,
    #[display("twos")]
    Twos,
    #[display("threes")]
    Threes,
    #[display("fours")]
    Fours,
    #[display("fives")]
    Fives,
    #[display("sixes")]
    Sixes,
    #[display("three_of_a_kind")]
    ThreeOfAKind,
    #[display("four_of_a_kind")]
    FourOfAKind,
    #[display("full_house")]
    FullHouse,
    #[display("small_straight")]
    SmallStraight,
    #[display("large_straight")]
    LargeStraight,
    #[display("dicee")]
    Dicee,
    #[display("chance")]
    Chance,
}

impl Category {
    /// All categories in scorecard order: the upper section first.
    pub const ALL: [Self; 13] = [
        Self::Ones,
        Self::Twos,
        Self::Threes,
        Self::Fours,
        Self::Fives,
        Self::Sixes,
        Self::ThreeOfAKind,
        Self::FourOfAKind,
        Self::FullHouse,
        Self::SmallStraight,
        Self::LargeStraight,
        Self::Dicee,
        Self::Chance,
    ];

    /// The six single-die-value categories counting toward the upper bonus.
    pub const UPPER: [Self; 6] = [
        Self::Ones,
        Self::Twos,
        Self::Threes,
        Self::Fours,
        Self::Fives,
        Self::Sixes,
    ];

    /// The seven combination categories of the lower section.
    pub const LOWER: [Self; 7] = [
        Self::ThreeOfAKind,
        Self::FourOfAKind,
        Self::FullHouse,
        Self::SmallStraight,
        Self::LargeStraight,
        Self::Dicee,
        Self::Chance,
    ];

    /// The snake_case internal name, used as a DataFrame column name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ones => "ones",
            Self::Twos => "twos",
            Self::Threes => "threes",
            Self::Fours => "fours",
            Self::Fives => "fives",
            Self::Sixes => "sixes",
            Self::ThreeOfAKind => "three_of_a_kind",
            Self::FourOfAKind => "four_of_a_kind",
            Self::FullHouse => "full_house",
            Self::SmallStraight => "small_straight",
            Self::LargeStraight => "large_straight",
            Self::Dicee => "dicee",
            Self::Chance => "chance",
        }
    }

    /// The camelCase wire spelling, used when naming fields in validation
    /// errors.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Ones => "ones",
            Self::Twos => "twos",
            Self::Threes => "threes",
            Self::Fours => "fours",
            Self::Fives => "fives",
            Self::Sixes => "sixes",
            Self::ThreeOfAKind => "threeOfAKind",
            Self::FourOfAKind => "fourOfAKind",
            Self::FullHouse => "fullHouse",
            Self::SmallStraight => "smallStraight",
            Self::LargeStraight => "largeStraight",
            Self::Dicee => "dicee",
            Self::Chance => "chance",
        }
    }

    /// Whether this category belongs to the upper section.
    #[must_use]
    pub fn is_upper(self) -> bool {
        Self::UPPER.contains(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_spelling_is_camel_case() {
        assert_eq!(
            serde_json::to_string(&Category::ThreeOfAKind).unwrap(),
            "\"threeOfAKind\""
        );
        assert_eq!(
            serde_json::from_str::<Category>("\"smallStraight\"").unwrap(),
            Category::SmallStraight
        );
    }

    #[test]
    fn test_wire_name_matches_serde_spelling() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.wire_name()));
        }
    }

    #[test]
    fn test_sections_partition_all_categories() {
        assert_eq!(Category::UPPER.len() + Category::LOWER.len(), Category::ALL.len());
        for category in Category::UPPER {
            assert!(category.is_upper());
        }
        for category in Category::LOWER {
            assert!(!category.is_upper());
        }
    }
}
