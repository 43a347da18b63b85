//! Time-of-day parsing for German announcement text.
//!
//! Announcements mix 24-hour and colloquial forms: "09:00 Uhr", "ab 15 Uhr",
//! "Beginn: 10.30 Uhr", and ranges like "11-14 Uhr" or
//! "09:00 bis 13:30 Uhr". A range keeps both the start and the optional end.

use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;

// Range first ("11-14 uhr", "9:00 - 13:30 Uhr", "von 10 bis 14 Uhr"); the
// single-time pattern would otherwise swallow the start half.
static RE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:von\s+)?(\d{1,2})(?:[:.](\d{2}))?\s*(?:uhr)?\s*(?:-|–|bis)\s*(\d{1,2})(?:[:.](\d{2}))?\s*uhr",
    )
    .unwrap()
});

static RE_SINGLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:ab\s+|beginn[:\s]\s*|start[:\s]\s*|um\s+)?(\d{1,2})(?:[:.](\d{2}))?\s*uhr")
        .unwrap()
});

/// Parse a start time and optional end time out of free text.
///
/// Returns `(None, None)` when nothing resolves; an end time without a start
/// cannot occur.
pub fn parse_time_range(text: &str) -> (Option<NaiveTime>, Option<NaiveTime>) {
    if let Some(caps) = RE_RANGE.captures(text) {
        let start = build_time(&caps[1], caps.get(2).map(|m| m.as_str()));
        let end = build_time(&caps[3], caps.get(4).map(|m| m.as_str()));
        if let Some(start) = start {
            return (Some(start), end);
        }
    }

    if let Some(caps) = RE_SINGLE.captures(text) {
        if let Some(start) = build_time(&caps[1], caps.get(2).map(|m| m.as_str())) {
            return (Some(start), None);
        }
    }

    (None, None)
}

fn build_time(hour: &str, minute: Option<&str>) -> Option<NaiveTime> {
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.unwrap_or("00").parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_single_time() {
        assert_eq!(parse_time_range("Turnierbeginn: 09:00 Uhr"), (Some(t(9, 0)), None));
        assert_eq!(parse_time_range("ab 15 Uhr"), (Some(t(15, 0)), None));
        assert_eq!(parse_time_range("um 10.30 uhr"), (Some(t(10, 30)), None));
        // Bare hour without minutes, as in "Samstag, 14 Uhr"
        assert_eq!(parse_time_range("Samstag, 14 Uhr"), (Some(t(14, 0)), None));
    }

    #[test]
    fn test_range() {
        assert_eq!(
            parse_time_range("von 11-14 uhr, Niveau 5"),
            (Some(t(11, 0)), Some(t(14, 0)))
        );
        assert_eq!(
            parse_time_range("09:00 bis 13:30 Uhr"),
            (Some(t(9, 0)), Some(t(13, 30)))
        );
        assert_eq!(
            parse_time_range("10:00 – 12:00 Uhr"),
            (Some(t(10, 0)), Some(t(12, 0)))
        );
    }

    #[test]
    fn test_unresolved() {
        assert_eq!(parse_time_range("kein Anpfiff"), (None, None));
        // Hours outside 0-23 stay unresolved instead of wrapping.
        assert_eq!(parse_time_range("25 Uhr"), (None, None));
    }

    #[test]
    fn test_date_is_not_a_time() {
        // "01.02.2026" must not be read as 1:02.
        assert_eq!(parse_time_range("Samstag, 01.02.2026"), (None, None));
    }
}
