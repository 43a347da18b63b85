//! Locale-aware normalization of raw text fragments.
//!
//! Every function here is a pure transformation from a free-text fragment to
//! a typed value or `None` ("unresolved"). Normalization never raises and
//! never guesses: an unrecognized token stays unresolved and only downgrades
//! the candidate's confidence downstream.
//!
//! The source locale is German (dates, weekday names, skill/age vocabulary).

pub mod category;
pub mod date;
pub mod text;
pub mod time;

pub use category::{parse_age_group, parse_skill_level};
pub use date::parse_date;
pub use text::{canonical_key, normalize_location, normalize_whitespace, title_prefix};
pub use time::parse_time_range;
