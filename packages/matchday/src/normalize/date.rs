//! German date parsing.
//!
//! Recognizes, in order of specificity:
//! - numeric dates with explicit year (`01.02.2026`, `1.2.26`, `01/02/2026`),
//!   day-first per German convention
//! - day + month name, with or without year (`25. Januar`, `3. März 2026`)
//! - numeric day.month without year (`25.01.`)
//! - relative words (`heute`, `morgen`, `übermorgen`)
//! - weekday names (`Samstag`, `nächsten Samstag`)
//!
//! Year-less forms resolve to the nearest future occurrence relative to the
//! reference date; weekday names resolve to the next strictly-future
//! occurrence.

use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use regex::Regex;

static RE_NUMERIC_FULL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})[./](\d{1,2})[./](\d{2,4})").unwrap());

static RE_MONTH_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\d{1,2})\.?\s*(januar|februar|märz|april|mai|juni|juli|august|september|oktober|november|dezember)\.?\s*(\d{4})?",
    )
    .unwrap()
});

// The regex crate has no lookahead, so "not followed by a digit" is spelled
// as an explicit non-digit-or-end alternative.
static RE_NUMERIC_NO_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\.(\d{1,2})\.(?:[^0-9]|$)").unwrap());

const MONTHS: [&str; 12] = [
    "januar",
    "februar",
    "märz",
    "april",
    "mai",
    "juni",
    "juli",
    "august",
    "september",
    "oktober",
    "november",
    "dezember",
];

const WEEKDAYS: [(&str, Weekday); 8] = [
    ("montag", Weekday::Mon),
    ("dienstag", Weekday::Tue),
    ("mittwoch", Weekday::Wed),
    ("donnerstag", Weekday::Thu),
    ("freitag", Weekday::Fri),
    ("samstag", Weekday::Sat),
    ("sonnabend", Weekday::Sat),
    ("sonntag", Weekday::Sun),
];

/// Parse a date out of free text, relative to `reference`.
///
/// Returns `None` when no date expression is recognized.
pub fn parse_date(text: &str, reference: NaiveDate) -> Option<NaiveDate> {
    if let Some(caps) = RE_NUMERIC_FULL.captures(text) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let mut year: i32 = caps[3].parse().ok()?;
        if year < 100 {
            year += 2000;
        }
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    if let Some(caps) = RE_MONTH_NAME.captures(text) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_number(&caps[2].to_lowercase())?;
        if let Some(year) = caps.get(3) {
            let year: i32 = year.as_str().parse().ok()?;
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        } else if let Some(date) = nearest_future(day, month, reference) {
            return Some(date);
        }
    }

    if let Some(caps) = RE_NUMERIC_NO_YEAR.captures(text) {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        if let Some(date) = nearest_future(day, month, reference) {
            return Some(date);
        }
    }

    let lower = text.to_lowercase();

    if lower.contains("übermorgen") {
        return reference.checked_add_days(Days::new(2));
    }
    // "morgen" must not fire inside "übermorgen" or "Morgenstunde"-like words.
    if contains_word(&lower, "morgen") && !lower.contains("übermorgen") {
        return reference.checked_add_days(Days::new(1));
    }
    if contains_word(&lower, "heute") {
        return Some(reference);
    }

    for (name, weekday) in WEEKDAYS {
        if contains_word(&lower, name) {
            return Some(next_weekday(reference, weekday));
        }
    }

    None
}

fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| *m == name)
        .map(|i| (i + 1) as u32)
}

/// Resolve a year-less day/month to its nearest future occurrence.
fn nearest_future(day: u32, month: u32, reference: NaiveDate) -> Option<NaiveDate> {
    let this_year = NaiveDate::from_ymd_opt(reference.year(), month, day);
    match this_year {
        Some(date) if date >= reference => Some(date),
        _ => NaiveDate::from_ymd_opt(reference.year() + 1, month, day),
    }
}

/// Next strictly-future occurrence of a weekday.
fn next_weekday(reference: NaiveDate, weekday: Weekday) -> NaiveDate {
    let ahead = (weekday.num_days_from_monday() + 7
        - reference.weekday().num_days_from_monday())
        % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    reference + Days::new(ahead as u64)
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.split(|c: char| !c.is_alphanumeric()).any(|t| t == word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> NaiveDate {
        // A Friday.
        NaiveDate::from_ymd_opt(2026, 1, 16).unwrap()
    }

    #[test]
    fn test_numeric_with_year() {
        assert_eq!(
            parse_date("Samstag, 01.02.2026", reference()),
            NaiveDate::from_ymd_opt(2026, 2, 1)
        );
        assert_eq!(
            parse_date("am 25.01.26", reference()),
            NaiveDate::from_ymd_opt(2026, 1, 25)
        );
        assert_eq!(
            parse_date("25/01/2026", reference()),
            NaiveDate::from_ymd_opt(2026, 1, 25)
        );
    }

    #[test]
    fn test_day_first_convention() {
        // 03.04. is the 3rd of April, never March 4th.
        assert_eq!(
            parse_date("03.04.2026", reference()),
            NaiveDate::from_ymd_opt(2026, 4, 3)
        );
    }

    #[test]
    fn test_month_name() {
        assert_eq!(
            parse_date("25. Januar", reference()),
            NaiveDate::from_ymd_opt(2026, 1, 25)
        );
        assert_eq!(
            parse_date("1. März 2027", reference()),
            NaiveDate::from_ymd_opt(2027, 3, 1)
        );
    }

    #[test]
    fn test_yearless_resolves_to_nearest_future() {
        // 25.01. is after the reference (16.01.) -> same year
        assert_eq!(
            parse_date("für den 25.01. suchen wir", reference()),
            NaiveDate::from_ymd_opt(2026, 1, 25)
        );
        // 05.01. already passed -> next year
        assert_eq!(
            parse_date("am 05.01.", reference()),
            NaiveDate::from_ymd_opt(2027, 1, 5)
        );
    }

    #[test]
    fn test_relative_words() {
        assert_eq!(parse_date("heute um 15 Uhr", reference()), Some(reference()));
        assert_eq!(
            parse_date("morgen Vormittag", reference()),
            NaiveDate::from_ymd_opt(2026, 1, 17)
        );
        assert_eq!(
            parse_date("übermorgen", reference()),
            NaiveDate::from_ymd_opt(2026, 1, 18)
        );
    }

    #[test]
    fn test_weekday_resolves_to_next_occurrence() {
        // Reference is Friday 2026-01-16; next Saturday is the 17th.
        assert_eq!(
            parse_date("Turnier am Samstag", reference()),
            NaiveDate::from_ymd_opt(2026, 1, 17)
        );
        assert_eq!(
            parse_date("nächsten Mittwoch", reference()),
            NaiveDate::from_ymd_opt(2026, 1, 21)
        );
        // Same weekday as the reference -> a week later, never today.
        assert_eq!(
            parse_date("Freitag", reference()),
            NaiveDate::from_ymd_opt(2026, 1, 23)
        );
    }

    #[test]
    fn test_unresolved() {
        assert_eq!(parse_date("kein Datum hier", reference()), None);
        // Invalid calendar dates stay unresolved rather than guessed.
        assert_eq!(parse_date("32.13.2026", reference()), None);
    }
}
