//! Free-text canonicalization helpers.
//!
//! These keep identity computation and fuzzy matching stable against the
//! whitespace, casing, and punctuation noise typical of chat text.

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a venue string: collapse whitespace, strip trailing punctuation,
/// cap the length so a run-on sentence cannot become a "location".
pub fn normalize_location(raw: &str) -> Option<String> {
    let cleaned = normalize_whitespace(raw);
    let cleaned = cleaned.trim_end_matches(['.', ',', ';', ':', '!']).trim();
    if cleaned.chars().count() < 5 {
        return None;
    }
    Some(cleaned.chars().take(80).collect())
}

/// Canonical key form used for identity hashing and fuzzy comparison:
/// lowercase, alphanumeric-only, single-spaced.
pub fn canonical_key(text: &str) -> String {
    let lowered = text.to_lowercase();
    let filtered: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    normalize_whitespace(&filtered)
}

/// First `len` characters of the canonical title, the slice that feeds the
/// identity hash.
pub fn title_prefix(title: &str, len: usize) -> String {
    canonical_key(title).chars().take(len).collect()
}
