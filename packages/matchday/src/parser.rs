//! WhatsApp chat-export parsing.
//!
//! Handles both export layouts seen in the wild:
//!
//! ```text
//! [13:32, 1/16/2026] +49 173 2843016: message text
//! 16/01/2026, 13:32 - +49 173 2843016: message text
//! ```
//!
//! Lines that match neither pattern continue the previous message. Media
//! placeholder markers are recorded as image references so the OCR
//! collaborator can be asked for the missing text later.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::types::message::RawMessage;

// [HH:MM, D/M/YYYY] sender: text  (separator may be . or /)
static RE_BRACKETED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d{1,2}:\d{2}),\s*(\d{1,2}[/.]\d{1,2}[/.]\d{4})\]\s*([^:]+):\s*(.*)$")
        .unwrap()
});

// D/M/YYYY, HH:MM - sender: text
static RE_DASHED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}/\d{1,2}/\d{4}),\s*(\d{1,2}:\d{2})\s*-\s*([^:]+):\s*(.*)$").unwrap()
});

static RE_MEDIA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<?(?:medien|media|bild|image|video|audio|document)[^>]*>?").unwrap()
});

/// Parse a whole chat-export text into messages.
///
/// Unparseable header lines are treated as continuations; a file with no
/// recognizable headers yields an empty list rather than an error.
pub fn parse_export_text(content: &str) -> Vec<RawMessage> {
    let mut messages: Vec<RawMessage> = Vec::new();

    for line in content.lines() {
        if let Some((timestamp, sender, text)) = parse_header_line(line) {
            let seq = messages.len();
            let mut message = RawMessage::new(
                format!("export-{seq:05}"),
                timestamp.and_utc(),
                sender,
                String::new(),
            );
            append_body(&mut message, &text);
            messages.push(message);
        } else if let Some(current) = messages.last_mut() {
            append_body(current, line);
        }
        // Preamble lines before the first header are dropped.
    }

    for message in &mut messages {
        message.text = message.text.trim().to_string();
    }

    messages
}

fn parse_header_line(line: &str) -> Option<(NaiveDateTime, String, String)> {
    if let Some(caps) = RE_BRACKETED.captures(line) {
        let timestamp = parse_timestamp(&caps[2], &caps[1])?;
        return Some((timestamp, caps[3].trim().to_string(), caps[4].to_string()));
    }
    if let Some(caps) = RE_DASHED.captures(line) {
        let timestamp = parse_timestamp(&caps[1], &caps[2])?;
        return Some((timestamp, caps[3].trim().to_string(), caps[4].to_string()));
    }
    None
}

/// Parse an export timestamp, trying US month-first and then EU day-first
/// order; exports produced on differently-configured phones disagree here.
fn parse_timestamp(date_str: &str, time_str: &str) -> Option<NaiveDateTime> {
    let date_str = date_str.replace('.', "/");
    let time = NaiveTime::parse_from_str(time_str, "%H:%M").ok()?;

    for format in ["%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(&date_str, format) {
            return Some(date.and_time(time));
        }
    }
    None
}

fn append_body(message: &mut RawMessage, line: &str) {
    if RE_MEDIA.is_match(line) {
        let seq = message.image_refs.len();
        let image_ref = format!("{}/media-{seq}", message.id);
        message.image_refs.push(image_ref);
        return;
    }
    if !message.text.is_empty() {
        message.text.push('\n');
    }
    message.text.push_str(line);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
[13:32, 1/16/2026] +49 173 2843016: Guten Tag zusammen
Wir suchen für den 25.01. zwei Mannschaften.

Beste Grüße Kay
[20:31, 1/16/2026] +49 176 70720831: Turnier am 01.02.2026
<Medien ausgeschlossen>
";

    #[test]
    fn test_parses_both_messages() {
        let messages = parse_export_text(SAMPLE);
        assert_eq!(messages.len(), 2);

        assert_eq!(messages[0].sender, "+49 173 2843016");
        assert!(messages[0].text.starts_with("Guten Tag zusammen"));
        assert!(messages[0].text.contains("Beste Grüße Kay"));
        assert_eq!(
            messages[0].timestamp.date_naive(),
            NaiveDate::from_ymd_opt(2026, 1, 16).unwrap()
        );

        assert_eq!(messages[1].image_refs.len(), 1);
        assert!(messages[1].text.contains("Turnier am 01.02.2026"));
    }

    #[test]
    fn test_dashed_format() {
        let messages =
            parse_export_text("16/01/2026, 13:32 - +49 173 000: Testspiel am Samstag\n");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "Testspiel am Samstag");
    }

    #[test]
    fn test_day_first_fallback() {
        // 25/12 only parses day-first.
        let messages = parse_export_text("[10:00, 25.12.2026] +49 1: Hallenturnier\n");
        assert_eq!(
            messages[0].timestamp.date_naive(),
            NaiveDate::from_ymd_opt(2026, 12, 25).unwrap()
        );
    }

    #[test]
    fn test_garbage_yields_empty() {
        assert!(parse_export_text("no headers anywhere\njust prose\n").is_empty());
    }
}
