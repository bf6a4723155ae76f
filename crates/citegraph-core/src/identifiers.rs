use once_cell::sync::Lazy;
use regex::Regex;

/// arXiv-style identifier body: `YYMM.NNNN` or `YYMM.NNNNN`.
pub const IDENTIFIER_PATTERN: &str = r"[0-9]{4}\.[0-9]{4,5}";

/// Extract the identifier token a filename starts with.
///
/// `"1909.11588_Some_Paper_sections_references.txt"` → `Some("1909.11588")`.
pub fn leading_identifier(filename: &str) -> Option<&str> {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(&format!(r"^({IDENTIFIER_PATTERN})")).unwrap());

    RE.captures(filename).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Whether the whole string is a bare identifier (no prefix, no version).
pub fn is_identifier(text: &str) -> bool {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(&format!(r"^{IDENTIFIER_PATTERN}$")).unwrap());

    RE.is_match(text)
}

/// Strip a leading `<identifier>_` prefix, if any.
pub fn strip_identifier_prefix(filename: &str) -> Option<&str> {
    static RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(&format!(r"^{IDENTIFIER_PATTERN}_(.+)")).unwrap());

    RE.captures(filename).and_then(|c| c.get(1)).map(|m| m.as_str())
}
