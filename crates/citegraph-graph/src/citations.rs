use std::collections::BTreeSet;

use citegraph_core::config_file::CitationsConfig;
use citegraph_core::text_utils::{char_len, normalize_whitespace};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::resolver::IdentifierTable;

/// Thresholds for the title heuristic and the reference file naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationConfig {
    /// Shortest period-delimited segment accepted as a title (default: 10).
    pub title_min_chars: usize,
    /// A segment with a 4-digit run shorter than this is a venue/year span
    /// and is skipped (default: 20).
    pub venue_span_max_chars: usize,
    /// Citation keys must be strictly longer than this (default: 5).
    pub min_citation_chars: usize,
    /// Suffix of per-paper reference files (default: `_sections_references.txt`).
    pub reference_suffix: String,
}

impl Default for CitationConfig {
    fn default() -> Self {
        Self {
            title_min_chars: 10,
            venue_span_max_chars: 20,
            min_citation_chars: 5,
            reference_suffix: "_sections_references.txt".to_string(),
        }
    }
}

impl CitationConfig {
    /// Defaults overridden by the `[citations]` section of a config file.
    pub fn from_file_config(file: &CitationsConfig) -> Self {
        let d = Self::default();
        Self {
            title_min_chars: file.title_min_chars.unwrap_or(d.title_min_chars),
            venue_span_max_chars: file.venue_span_max_chars.unwrap_or(d.venue_span_max_chars),
            min_citation_chars: file.min_citation_chars.unwrap_or(d.min_citation_chars),
            reference_suffix: file.reference_suffix.clone().unwrap_or(d.reference_suffix),
        }
    }
}

static ARXIV_PREFIXED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)arxiv:([0-9]{4}\.[0-9]{4,5})").unwrap());
static BARE_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([0-9]{4}\.[0-9]{4,5})\b").unwrap());
static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+\s+").unwrap());
static LEADING_NUMBER_LOOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+\s*").unwrap());
static SEGMENT_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\s+").unwrap());
static FOUR_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{4}").unwrap());

/// Extract citation identities from one paper's reference list.
pub fn extract(text: &str, table: &IdentifierTable) -> BTreeSet<String> {
    extract_with_config(text, table, &CitationConfig::default())
}

/// Config-aware version of [`extract`].
///
/// Union of two passes:
/// - identifiers anywhere in the text, resolved through `table` or kept raw
/// - one title (or the whole de-numbered line) per line starting with a digit
pub fn extract_with_config(
    text: &str,
    table: &IdentifierTable,
    config: &CitationConfig,
) -> BTreeSet<String> {
    let mut citations = BTreeSet::new();

    for re in [&*ARXIV_PREFIXED, &*BARE_IDENTIFIER] {
        for caps in re.captures_iter(text) {
            let id = &caps[1];
            citations.insert(table.resolve_or_raw(id).to_string());
        }
    }

    for line in text.lines().map(str::trim) {
        if !line.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }
        match title_from_reference(line, config) {
            Some(title) => {
                let title = normalize_whitespace(&title);
                if char_len(&title) > config.min_citation_chars {
                    citations.insert(title);
                }
            }
            None => {
                let key = LEADING_NUMBER_LOOSE.replace(line, "");
                let key = key.trim();
                if char_len(key) > config.min_citation_chars {
                    citations.insert(key.to_string());
                }
            }
        }
    }

    citations
}

/// Guess the title of an `N Authors. Title. Venue, Year.` reference line.
///
/// Returns the first period-delimited segment that is long enough and does not
/// look like a short venue/year span. `None` when the line has fewer than
/// three period-separated parts or no segment qualifies.
pub fn title_from_reference(line: &str, config: &CitationConfig) -> Option<String> {
    let text = LEADING_NUMBER.replace(line, "");
    if text.split('.').count() < 3 {
        return None;
    }

    SEGMENT_BREAK
        .split(&text)
        .filter(|segment| char_len(segment) >= config.title_min_chars)
        .find(|segment| {
            !(FOUR_DIGITS.is_match(segment) && char_len(segment) < config.venue_span_max_chars)
        })
        .map(|segment| segment.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> IdentifierTable {
        IdentifierTable::from_iter([("1909.11588".to_string(), "PaperX".to_string())])
    }

    #[test]
    fn test_identifier_resolved_through_table() {
        let citations = extract("Some text citing arXiv:1909.11588 here", &table());
        assert!(citations.contains("PaperX"));
        assert!(!citations.contains("1909.11588"));
    }

    #[test]
    fn test_unknown_identifier_kept_raw() {
        let citations = extract("see ARXIV:2101.00001 and 2202.12345.", &table());
        assert!(citations.contains("2101.00001"));
        assert!(citations.contains("2202.12345"));
    }

    #[test]
    fn test_versioned_identifier_needs_prefix() {
        let bare = extract("cited as 2101.00001v2 in text", &table());
        assert!(bare.is_empty());
        let prefixed = extract("cited as arXiv:2101.00001v2 in text", &table());
        assert!(prefixed.contains("2101.00001"));
    }

    #[test]
    fn test_title_from_numbered_line() {
        let config = CitationConfig::default();
        let title = title_from_reference(
            "1 Alice, B. Learning graph structure from text. Proc. Venue, 2019.",
            &config,
        );
        assert_eq!(title.as_deref(), Some("Learning graph structure from text"));
    }

    #[test]
    fn test_title_skips_short_year_span() {
        let config = CitationConfig::default();
        // "Venue 2019" is long enough but looks like a venue/year span
        let title = title_from_reference("3 Ab. Venue 2019. Some actual title here. x", &config);
        assert_eq!(title.as_deref(), Some("Some actual title here"));
    }

    #[test]
    fn test_title_requires_three_parts() {
        let config = CitationConfig::default();
        assert_eq!(title_from_reference("2 Only one period. here", &config), None);
    }

    #[test]
    fn test_whole_line_fallback() {
        let citations = extract("7 Untitled reference without periods", &table());
        assert!(citations.contains("Untitled reference without periods"));
    }

    #[test]
    fn test_short_keys_dropped() {
        let citations = extract("12 abc\n\n13\nnot numbered. at all. really", &table());
        assert!(citations.is_empty());
    }

    #[test]
    fn test_whitespace_normalized_and_deduplicated() {
        let text = "1 A. B. Deep   learning for   graphs. Venue, 2019.\n\
                    2 C. D. Deep learning for graphs. Other venue, 2020.";
        let citations = extract(text, &IdentifierTable::default());
        assert_eq!(
            citations.iter().filter(|c| c.starts_with("Deep")).count(),
            1
        );
        assert!(citations.contains("Deep learning for graphs"));
    }

    #[test]
    fn test_from_file_config() {
        let file = CitationsConfig {
            title_min_chars: Some(15),
            ..Default::default()
        };
        let config = CitationConfig::from_file_config(&file);
        assert_eq!(config.title_min_chars, 15);
        assert_eq!(config.venue_span_max_chars, 20);
        assert_eq!(config.reference_suffix, "_sections_references.txt");
    }
}
