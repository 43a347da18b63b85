//! Categorical normalization: skill levels and age groups.
//!
//! Both map locale vocabulary onto closed sets via lookup tables. An
//! unrecognized token yields `None`, never a guessed value.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::event::{AgeGroup, SkillLevel};

// "Stärke 5", "Niveau: 3", "Spielstärke 2-3", "7/10"
static RE_LEVEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:spielstärke|stärke|niveau|level)[:\s]*(\d{1,2})(?:\s*[-–]\s*(\d{1,2}))?")
        .unwrap()
});

static RE_LEVEL_OF_TEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\s*/\s*10").unwrap());

// Word labels used instead of numbers; maps onto the 1-10 scale.
const LEVEL_SYNONYMS: [(&str, u8); 6] = [
    ("anfänger", 1),
    ("schwach", 2),
    ("unteres niveau", 3),
    ("mittelstark", 6),
    ("mittel", 5),
    ("stark", 8),
];

static RE_YOUTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([a-g])\s*[- ]?\s*jugend").unwrap());

static RE_BIRTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:jahrgang|jg)[.:\s]*(\d{2,4})").unwrap());

static RE_UNDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bu\s*(\d{1,2})\b").unwrap());

/// Parse a skill level from free text.
///
/// A range like "Stärke 2-3" resolves to its lower bound, matching how the
/// announcements are read (the weaker team should still apply).
pub fn parse_skill_level(text: &str) -> Option<SkillLevel> {
    if let Some(caps) = RE_LEVEL.captures(text) {
        if let Ok(level) = caps[1].parse::<u8>() {
            if let Some(level) = SkillLevel::new(level) {
                return Some(level);
            }
        }
    }

    if let Some(caps) = RE_LEVEL_OF_TEN.captures(text) {
        if let Ok(level) = caps[1].parse::<u8>() {
            if let Some(level) = SkillLevel::new(level) {
                return Some(level);
            }
        }
    }

    let lower = text.to_lowercase();
    for (word, level) in LEVEL_SYNONYMS {
        if lower.contains(word) {
            return SkillLevel::new(level);
        }
    }

    None
}

/// Parse an age group from free text.
pub fn parse_age_group(text: &str) -> Option<AgeGroup> {
    if let Some(caps) = RE_YOUTH.captures(text) {
        let class = caps[1].chars().next()?.to_ascii_uppercase();
        return Some(AgeGroup::Youth(class));
    }

    if let Some(caps) = RE_BIRTH_YEAR.captures(text) {
        let year: u16 = caps[1].parse().ok()?;
        let year = if year < 100 { 2000 + year } else { year };
        if (1990..=2100).contains(&year) {
            return Some(AgeGroup::BirthYear(year));
        }
        return None;
    }

    if let Some(caps) = RE_UNDER.captures(text) {
        let n: u8 = caps[1].parse().ok()?;
        if (5..=23).contains(&n) {
            return Some(AgeGroup::Under(n));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_level_patterns() {
        assert_eq!(parse_skill_level("Niveau 5").unwrap().value(), 5);
        assert_eq!(parse_skill_level("Spielstärke: 2-3 ( 1-10 Skala )").unwrap().value(), 2);
        // Explicit "7/10" wins over the word label next to it.
        assert_eq!(parse_skill_level("mittelstark 7/10").unwrap().value(), 7);
        assert_eq!(parse_skill_level("wir sind eher 4/10").unwrap().value(), 4);
    }

    #[test]
    fn test_skill_level_synonyms() {
        assert_eq!(parse_skill_level("eher schwach besetzt").unwrap().value(), 2);
        assert_eq!(parse_skill_level("Anfänger willkommen").unwrap().value(), 1);
    }

    #[test]
    fn test_skill_level_unresolved() {
        assert!(parse_skill_level("kein Hinweis").is_none());
        // Out-of-scale numbers are not coerced.
        assert!(parse_skill_level("Stärke 15").is_none());
    }

    #[test]
    fn test_age_group_patterns() {
        assert_eq!(parse_age_group("die 2. D-Jugend lädt ein"), Some(AgeGroup::Youth('D')));
        assert_eq!(parse_age_group("Jahrgang 2014"), Some(AgeGroup::BirthYear(2014)));
        assert_eq!(parse_age_group("JG15 gesucht"), Some(AgeGroup::BirthYear(2015)));
        assert_eq!(parse_age_group("U12 Turnier"), Some(AgeGroup::Under(12)));
    }

    #[test]
    fn test_age_group_unresolved() {
        assert!(parse_age_group("Herrenmannschaft").is_none());
        assert!(parse_age_group("Jahrgang 12345").is_none());
    }
}
