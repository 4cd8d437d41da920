//! Alternate username suggestions
//!
//! Candidates come from a lower-cased, alphanumeric-only stem, in priority
//! order: numeric suffixes 1..=99, then the current year, then fixed word
//! suffixes. At most `MAX_SUGGESTIONS` are returned. Suggestions are
//! advisory and are not checked against the filter or the lookup service.

use chrono::Datelike;

pub const MAX_SUGGESTIONS: usize = 5;

/// Word suffixes tried after the numeric and year candidates
pub const SUGGESTION_SUFFIXES: &[&str] = &["_dev", "_gamer", "_pro", "_x", "_official"];

/// Lower-case `base` and drop everything that is not an ASCII letter or digit
pub fn suggestion_stem(base: &str) -> String {
    base.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Suggestions using the current calendar year
pub fn generate_suggestions(base: &str) -> Vec<String> {
    generate_suggestions_for_year(base, chrono::Utc::now().year())
}

/// Suggestions using an explicit year
pub fn generate_suggestions_for_year(base: &str, year: i32) -> Vec<String> {
    let stem = suggestion_stem(base);

    let numbered = (1..=99).map(|i| format!("{}{}", stem, i));
    let dated = std::iter::once(format!("{}{}", stem, year));
    let worded = SUGGESTION_SUFFIXES
        .iter()
        .map(|suffix| format!("{}{}", stem, suffix));

    numbered
        .chain(dated)
        .chain(worded)
        .take(MAX_SUGGESTIONS)
        .collect()
}
