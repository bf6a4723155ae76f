use citegraph_core::text_utils::{char_len, find_year, has_year_token, normalize_whitespace};
use citegraph_core::ReferenceEntry;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;

/// Phrases that stand in for a year on forthcoming or preprint references.
const UNDATED_MARKERS: [&str; 3] = ["in press", "to appear", "arxiv"];

/// Join soft-wrapped lines back onto the entry they belong to.
///
/// A candidate whose first non-whitespace character is lowercase continues
/// the previous one. The first candidate always starts an entry.
pub fn merge_continuations<S: AsRef<str>>(candidates: &[S]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let text = candidate.as_ref().trim();
        let continues = text.chars().next().is_some_and(char::is_lowercase);
        match merged.last_mut() {
            Some(previous) if continues => {
                previous.push(' ');
                previous.push_str(text);
            }
            _ => merged.push(text.to_string()),
        }
    }
    merged
}

/// Whether a candidate looks like a real reference rather than parsing noise.
pub fn is_valid_reference(text: &str, config: &ParsingConfig) -> bool {
    let normalized = normalize_whitespace(text);
    if char_len(&normalized) < config.min_entry_chars {
        return false;
    }
    if has_year_token(&normalized) {
        return true;
    }
    let lower = normalized.to_lowercase();
    UNDATED_MARKERS.iter().any(|m| lower.contains(m))
}

/// Leading `[12]`, `12.` or `12 ` sequence number.
fn sequence_number(text: &str) -> Option<u32> {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?:\[([0-9]{1,4})\]|([0-9]{1,4})\.?)\s").unwrap());

    let caps = RE.captures(text)?;
    caps.get(1).or_else(|| caps.get(2))?.as_str().parse().ok()
}

/// Merge, validate and normalize segmenter output for one paper.
///
/// Order follows the input. Rejected candidates are dropped without a trace.
pub fn clean<S: AsRef<str>>(paper: &str, candidates: &[S]) -> Vec<ReferenceEntry> {
    clean_with_config(paper, candidates, &ParsingConfig::default())
}

/// Config-aware version of [`clean`].
pub fn clean_with_config<S: AsRef<str>>(
    paper: &str,
    candidates: &[S],
    config: &ParsingConfig,
) -> Vec<ReferenceEntry> {
    merge_continuations(candidates)
        .into_iter()
        .filter(|c| is_valid_reference(c, config))
        .map(|c| {
            let text = normalize_whitespace(&c);
            ReferenceEntry {
                paper: paper.to_string(),
                number: sequence_number(&text),
                year: find_year(&text),
                text,
            }
        })
        .collect()
}
