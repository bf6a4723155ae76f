use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:19|20)[0-9]{2}").unwrap());

/// Collapse every run of whitespace to a single space and trim.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Length in characters, not bytes. All length thresholds use this.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Whether the text contains a 19xx/20xx token anywhere.
///
/// Not word-bounded, so digits inside longer numbers (`"ISBN 9781..."`) count too.
pub fn has_year_token(text: &str) -> bool {
    YEAR_RE.is_match(text)
}

/// First 19xx/20xx token in the text.
pub fn find_year(text: &str) -> Option<u16> {
    YEAR_RE.find(text).and_then(|m| m.as_str().parse().ok())
}

/// Shorten to at most `max` characters, appending `...` when cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Read a text file, dropping any bytes that are not valid UTF-8.
pub fn read_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect())
}
