//! Scorecard state with derived section totals.

use serde::{Deserialize, Serialize};

use crate::{category::Category, error::{self, SchemaError}};

/// Upper-section total required to earn the fixed bonus.
pub const UPPER_BONUS_THRESHOLD: i64 = 63;

/// Scorecard state for one player.
///
/// Each category is optional: `None` means the category has not been scored.
/// Section totals and the bonus flag are derived on demand, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    pub ones: Option<i64>,
    pub twos: Option<i64>,
    pub threes: Option<i64>,
    pub fours: Option<i64>,
    pub fives: Option<i64>,
    pub sixes: Option<i64>,
    #[serde(alias = "three_of_a_kind")]
    pub three_of_a_kind: Option<i64>,
    #[serde(alias = "four_of_a_kind")]
    pub four_of_a_kind: Option<i64>,
    #[serde(alias = "full_house")]
    pub full_house: Option<i64>,
    #[serde(alias = "small_straight")]
    pub small_straight: Option<i64>,
    #[serde(alias = "large_straight")]
    pub large_straight: Option<i64>,
    pub dicee: Option<i64>,
    pub chance: Option<i64>,
}

impl Scorecard {
    /// The recorded score for `category`, if any.
    #[must_use]
    pub fn score(&self, category: Category) -> Option<i64> {
        match category {
            Category::Ones => self.ones,
            Category::Twos => self.twos,
            Category::Threes => self.threes,
            Category::Fours => self.fours,
            Category::Fives => self.fives,
            Category::Sixes => self.sixes,
            Category::ThreeOfAKind => self.three_of_a_kind,
            Category::FourOfAKind => self.four_of_a_kind,
            Category::FullHouse => self.full_house,
            Category::SmallStraight => self.small_straight,
            Category::LargeStraight => self.large_straight,
            Category::Dicee => self.dicee,
            Category::Chance => self.chance,
        }
    }

    /// Sum of the six upper-section categories, treating absent as zero.
    #[must_use]
    pub fn upper_section_score(&self) -> i64 {
        Category::UPPER
            .iter()
            .filter_map(|&c| self.score(c))
            .sum()
    }

    /// Sum of the seven lower-section categories, treating absent as zero.
    #[must_use]
    pub fn lower_section_score(&self) -> i64 {
        Category::LOWER
            .iter()
            .filter_map(|&c| self.score(c))
            .sum()
    }

    /// Whether the upper-section total reaches the bonus threshold (63).
    #[must_use]
    pub fn upper_bonus(&self) -> bool {
        self.upper_section_score() >= UPPER_BONUS_THRESHOLD
    }

    pub(crate) fn validate(&self) -> Result<(), SchemaError> {
        for category in Category::ALL {
            if let Some(value) = self.score(category) {
                error::check_non_negative(category.wire_name(), value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_scorecard() -> Scorecard {
        Scorecard {
            ones: Some(3),
            twos: Some(6),
            threes: Some(9),
            fours: Some(12),
            fives: Some(15),
            sixes: Some(18),
            three_of_a_kind: Some(25),
            four_of_a_kind: Some(28),
            full_house: Some(25),
            small_straight: Some(30),
            large_straight: Some(40),
            dicee: Some(50),
            chance: Some(23),
        }
    }

    #[test]
    fn test_section_totals() {
        let card = full_scorecard();
        assert_eq!(card.upper_section_score(), 3 + 6 + 9 + 12 + 15 + 18);
        assert_eq!(card.lower_section_score(), 25 + 28 + 25 + 30 + 40 + 50 + 23);
    }

    #[test]
    fn test_upper_bonus_boundary() {
        let mut card = Scorecard {
            sixes: Some(63),
            ..Scorecard::default()
        };
        assert!(card.upper_bonus());
        card.sixes = Some(62);
        assert!(!card.upper_bonus());
    }

    #[test]
    fn test_absent_categories_count_as_zero() {
        let card = Scorecard {
            ones: Some(3),
            dicee: Some(50),
            ..Scorecard::default()
        };
        assert_eq!(card.upper_section_score(), 3);
        assert_eq!(card.lower_section_score(), 50);
        assert!(!card.upper_bonus());
    }

    #[test]
    fn test_accepts_both_field_spellings() {
        let camel: Scorecard =
            serde_json::from_str(r#"{"threeOfAKind": 25, "ones": 3}"#).unwrap();
        let snake: Scorecard =
            serde_json::from_str(r#"{"three_of_a_kind": 25, "ones": 3}"#).unwrap();
        assert_eq!(camel, snake);
        assert_eq!(camel.three_of_a_kind, Some(25));
    }

    #[test]
    fn test_serializes_camel_case() {
        let card = Scorecard {
            small_straight: Some(30),
            ..Scorecard::default()
        };
        let json = serde_json::to_string(&card).unwrap();
        assert!(json.contains("\"smallStraight\":30"));
        assert!(!json.contains("small_straight"));
    }

    #[test]
    fn test_negative_category_is_rejected_naming_wire_field() {
        let card = Scorecard {
            full_house: Some(-1),
            ..Scorecard::default()
        };
        assert!(matches!(
            card.validate(),
            Err(SchemaError::Negative {
                field: "fullHouse",
                value: -1
            })
        ));
    }
}
