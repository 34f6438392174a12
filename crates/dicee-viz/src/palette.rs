//! Fixed profile color palette shared by every chart.

use plotters::style::RGBColor;

pub const RILEY: RGBColor = RGBColor(0x66, 0xC2, 0xA5);
pub const CARMEN: RGBColor = RGBColor(0xFC, 0x8D, 0x62);
pub const LIAM: RGBColor = RGBColor(0x8D, 0xA0, 0xCB);
pub const PROFESSOR: RGBColor = RGBColor(0xE7, 0x8A, 0xC3);
pub const CHARLIE: RGBColor = RGBColor(0xA6, 0xD8, 0x54);
pub const NEUTRAL: RGBColor = RGBColor(0x80, 0x80, 0x80);

/// Color assigned to a profile; unknown profiles render neutral gray so
/// that charts over custom data stay legible.
#[must_use]
pub fn profile_color(profile: &str) -> RGBColor {
    match profile {
        "riley" => RILEY,
        "carmen" => CARMEN,
        "liam" => LIAM,
        "professor" => PROFESSOR,
        "charlie" => CHARLIE,
        _ => NEUTRAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_profiles_have_distinct_colors() {
        let colors = [
            profile_color("riley"),
            profile_color("carmen"),
            profile_color("liam"),
            profile_color("professor"),
            profile_color("charlie"),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_unknown_profile_is_neutral() {
        assert_eq!(profile_color("custom"), NEUTRAL);
        assert_eq!(profile_color("whatever"), NEUTRAL);
    }
}
