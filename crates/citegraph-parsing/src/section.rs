use citegraph_core::text_utils::char_len;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::config::ParsingConfig;

/// Segmentation strategy identifier, in the order the chain tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentationStrategy {
    /// `[Knu84] ...`, `[12] ...`, `[Author, 2019] ...`
    Bracketed,
    /// `1 Author ... 2 Author ...` with no punctuation after the number
    BareNumbered,
    /// `1. Author ... 2. Author ...`
    DotNumbered,
    /// One reference per existing line, long lines blob-split
    LineBased,
    /// Blob split of the flattened text, or the text itself
    Fallback,
}

/// Result of running the strategy chain over one blob.
#[derive(Debug, Clone)]
pub struct SegmentationResult {
    pub strategy: SegmentationStrategy,
    pub references: Vec<String>,
}

/// A reference blob prepared once for every strategy.
#[derive(Debug, Clone)]
pub struct RefBlob<'a> {
    original: &'a str,
    /// Trimmed, non-empty lines of the original text.
    lines: Vec<&'a str>,
    /// `lines` joined by single spaces.
    flat: String,
}

impl<'a> RefBlob<'a> {
    pub fn new(text: &'a str) -> Self {
        let lines: Vec<&str> = text
            .split('\n')
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let flat = lines.join(" ");
        Self {
            original: text,
            lines,
            flat,
        }
    }
}

/// A strategy returns `None` when its signal is too weak to apply.
pub type StrategyFn = fn(&RefBlob<'_>, &ParsingConfig) -> Option<Vec<String>>;

/// Ordered from the most to the least precise signal. [`fallback`] closes the
/// chain and always produces something.
pub const STRATEGY_CHAIN: [(SegmentationStrategy, StrategyFn); 4] = [
    (SegmentationStrategy::Bracketed, try_bracketed),
    (SegmentationStrategy::BareNumbered, try_bare_numbered),
    (SegmentationStrategy::DotNumbered, try_dot_numbered),
    (SegmentationStrategy::LineBased, try_line_based),
];

/// Split a raw bibliography blob into candidate reference strings.
///
/// Never fails: for any input the result has at least one element.
pub fn segment(blob: &str) -> Vec<String> {
    segment_with_config(blob, &ParsingConfig::default()).references
}

/// Config-aware version of [`segment`] that also reports the winning strategy.
pub fn segment_with_config(blob: &str, config: &ParsingConfig) -> SegmentationResult {
    let prepared = RefBlob::new(blob);

    for (strategy, try_strategy) in STRATEGY_CHAIN {
        if let Some(references) = try_strategy(&prepared, config) {
            return SegmentationResult {
                strategy,
                references,
            };
        }
    }

    SegmentationResult {
        strategy: SegmentationStrategy::Fallback,
        references: fallback(&prepared, config),
    }
}

fn non_empty(refs: Vec<String>) -> Option<Vec<String>> {
    if refs.is_empty() { None } else { Some(refs) }
}

// ── Markers with look-ahead ──

/// Find non-overlapping `lead` matches that are immediately followed by text
/// matching `follow` (which must be anchored with `^`).
///
/// The regex crate has no look-ahead, so the trailing context is checked in
/// code. A rejected candidate restarts the scan one character after its start,
/// which is where a backtracking engine would retry.
fn captures_followed_by<'t>(text: &'t str, lead: &Regex, follow: &Regex) -> Vec<Captures<'t>> {
    let mut found = Vec::new();
    let mut pos = 0;
    while pos <= text.len() {
        let Some(caps) = lead.captures_at(text, pos) else {
            break;
        };
        let m = caps.get(0).unwrap();
        if follow.is_match(&text[m.end()..]) {
            pos = if m.end() > m.start() {
                m.end()
            } else {
                next_char_boundary(text, m.end())
            };
            found.push(caps);
        } else {
            pos = next_char_boundary(text, m.start());
        }
    }
    found
}

fn next_char_boundary(text: &str, idx: usize) -> usize {
    idx + text[idx..].chars().next().map_or(1, char::len_utf8)
}

static CAPITAL_NEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]").unwrap());

/// A leading reference number found in running text.
#[derive(Debug, Clone)]
struct NumberMarker {
    /// Start of the whole match, including the whitespace before the number.
    match_start: usize,
    /// Start of the digits.
    number_start: usize,
    /// End of the match, after the whitespace that follows the number.
    match_end: usize,
    /// The number token as written (`12` or `12.`).
    token: String,
    value: u64,
}

fn number_markers(text: &str, lead: &Regex) -> Vec<NumberMarker> {
    captures_followed_by(text, lead, &CAPITAL_NEXT)
        .into_iter()
        .map(|caps| {
            let whole = caps.get(0).unwrap();
            let number = caps.get(1).unwrap();
            let digits = number.as_str().trim_end_matches('.');
            NumberMarker {
                match_start: whole.start(),
                number_start: number.start(),
                match_end: whole.end(),
                token: number.as_str().to_string(),
                value: digits.parse().unwrap_or(u64::MAX),
            }
        })
        .collect()
}

/// `N Author` numbering: an integer, whitespace, then a capital letter.
fn bare_number_markers(text: &str) -> Vec<NumberMarker> {
    static LEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\s)([0-9]+)\s+").unwrap());
    number_markers(text, &LEAD)
}

/// `N. Author` numbering, 1-3 digits so years are never taken for numbers.
fn dot_number_markers(text: &str) -> Vec<NumberMarker> {
    static LEAD: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?:^|\s)([0-9]{1,3}\.)\s+").unwrap());
    number_markers(text, &LEAD)
}

/// Adjacent pairs where the second number is exactly one more than the first.
fn consecutive_increments(values: &[u64]) -> usize {
    values
        .windows(2)
        .filter(|w| w[0].checked_add(1) == Some(w[1]))
        .count()
}

/// Whether detected numbers look like a reference numbering run.
fn is_sequential_run(values: &[u64], min_numbers: usize, min_ratio: f64) -> bool {
    values.len() >= min_numbers
        && consecutive_increments(values) as f64 > values.len() as f64 * min_ratio
}

fn marker_values(markers: &[NumberMarker]) -> Vec<u64> {
    markers.iter().map(|m| m.value).collect()
}

// ── Strategy 1: bracketed markers ──

static BRACKET_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(?:\p{Lu}[\p{L}0-9+]*[0-9]{2}|[0-9]+|[^\]]+, [0-9]{4})\]").unwrap()
});

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^REFERENCES\s*").unwrap());

fn try_bracketed(blob: &RefBlob<'_>, config: &ParsingConfig) -> Option<Vec<String>> {
    let marker_re = config.bracket_marker_re.as_ref().unwrap_or(&BRACKET_MARKER);
    if marker_re.find_iter(&blob.flat).count() < config.min_bracket_markers {
        return None;
    }

    let heading_re = config.heading_re.as_ref().unwrap_or(&HEADING);
    let cleaned = heading_re.replace(&blob.flat, "");
    non_empty(split_at_markers(&cleaned, marker_re))
}

/// Split text at each bracket marker; the marker stays at the head of its
/// reference. Text before the first marker becomes its own piece.
pub fn split_at_bracket_markers(text: &str) -> Vec<String> {
    split_at_markers(text, &BRACKET_MARKER)
}

fn split_at_markers(text: &str, marker_re: &Regex) -> Vec<String> {
    fn append_piece(current: &mut String, piece: &str) {
        let piece = piece.trim();
        if piece.is_empty() {
            return;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(piece);
    }

    let mut refs = Vec::new();
    let mut current = String::new();
    let mut last = 0;
    for m in marker_re.find_iter(text) {
        append_piece(&mut current, &text[last..m.start()]);
        if !current.is_empty() {
            refs.push(std::mem::take(&mut current));
        }
        current.push_str(m.as_str());
        last = m.end();
    }
    append_piece(&mut current, &text[last..]);
    if !current.is_empty() {
        refs.push(current);
    }
    refs
}

// ── Strategy 2: bare sequential numbers ──

fn try_bare_numbered(blob: &RefBlob<'_>, config: &ParsingConfig) -> Option<Vec<String>> {
    let markers = bare_number_markers(&blob.flat);
    if !is_sequential_run(
        &marker_values(&markers),
        config.bare_run_min_numbers,
        config.bare_run_min_ratio,
    ) {
        return None;
    }
    non_empty(split_at_number_starts(&blob.flat, &markers))
}

/// Split text at every `N Author` number, keeping the number with its text.
/// Anything before the first number is dropped.
pub fn split_at_bare_numbers(text: &str) -> Vec<String> {
    split_at_number_starts(text, &bare_number_markers(text))
}

fn split_at_number_starts(text: &str, markers: &[NumberMarker]) -> Vec<String> {
    let mut starts: Vec<usize> = markers.iter().map(|m| m.number_start).collect();
    let Some(&first) = starts.first() else {
        return Vec::new();
    };
    starts.push(text.len());

    let mut parts = Vec::with_capacity(markers.len());
    let mut current = first;
    for &next in &starts[1..] {
        let part = text[current..next].trim();
        if !part.is_empty() {
            parts.push(part.to_string());
        }
        current = next;
    }
    parts
}

// ── Strategy 3: "N." numbering ──

fn try_dot_numbered(blob: &RefBlob<'_>, config: &ParsingConfig) -> Option<Vec<String>> {
    let markers = dot_number_markers(&blob.flat);
    if markers.len() < config.numbered_run_min_matches {
        return None;
    }

    let values = marker_values(&markers);
    // The list has to start at the top, not mid-way through some volume numbers
    if !matches!(values.first(), Some(0 | 1)) {
        return None;
    }
    let increments = consecutive_increments(&values) as f64;
    if increments <= values.len() as f64 * config.numbered_run_min_ratio {
        return None;
    }

    let mut refs = Vec::with_capacity(markers.len());
    for (i, marker) in markers.iter().enumerate() {
        let end = markers
            .get(i + 1)
            .map(|next| next.match_start)
            .unwrap_or(blob.flat.len());
        let body = blob.flat[marker.match_end..end].trim();
        refs.push(format!("{} {}", marker.token, body));
    }
    non_empty(refs)
}

// ── Strategy 4: existing lines ──

fn try_line_based(blob: &RefBlob<'_>, config: &ParsingConfig) -> Option<Vec<String>> {
    // A flattened blob may still carry a clear bare numbering run
    let recheck = marker_values(&bare_number_markers(&blob.flat));
    if is_sequential_run(
        &recheck,
        config.line_recheck_min_numbers,
        config.line_recheck_min_ratio,
    ) {
        return non_empty(split_blob(&blob.flat, config));
    }

    let mut candidates = Vec::new();
    for line in &blob.lines {
        if char_len(line) > config.long_line_chars {
            candidates.extend(split_blob(line, config));
        } else {
            candidates.push(line.to_string());
        }
    }

    let valid: Vec<String> = candidates
        .into_iter()
        .filter(|c| char_len(c) >= config.min_line_chars && !c.eq_ignore_ascii_case("references"))
        .collect();

    if valid.len() >= config.min_line_candidates {
        Some(valid)
    } else {
        None
    }
}

// ── Strategy 5: fallback ──

/// Blob-split the flattened text; when that yields nothing usable, return the
/// original text unchanged.
pub fn fallback(blob: &RefBlob<'_>, config: &ParsingConfig) -> Vec<String> {
    let parts = split_blob(&blob.flat, config);
    if parts.iter().any(|p| !p.is_empty()) {
        parts
    } else {
        vec![blob.original.to_string()]
    }
}

// ── Blob splitting ──

/// Split an unstructured run of references.
///
/// 1. A bare `N Author` numbering run splits at each number.
/// 2. Otherwise sentence boundaries (`. ` before `Surname,` or `I. Surname`)
///    split it, merging spans that would be too short.
/// 3. Otherwise the text comes back as a single span.
pub fn split_blob(text: &str, config: &ParsingConfig) -> Vec<String> {
    let markers = bare_number_markers(text);
    if is_sequential_run(
        &marker_values(&markers),
        config.bare_run_min_numbers,
        config.bare_run_min_ratio,
    ) {
        return split_at_number_starts(text, &markers);
    }

    split_at_sentence_boundaries(text, config).unwrap_or_else(|| vec![text.to_string()])
}

fn split_at_sentence_boundaries(text: &str, config: &ParsingConfig) -> Option<Vec<String>> {
    static PERIOD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\s+").unwrap());
    // "Surname," starts the next reference
    static SURNAME_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-z]+,").unwrap());
    // "I. Surname" / "I Surname" starts the next reference
    static INITIAL_SURNAME: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[A-Z]\.?\s+[A-Z][a-z]+").unwrap());

    let mut boundaries = captures_followed_by(text, &PERIOD, &SURNAME_COMMA);
    if boundaries.len() < config.min_sentence_boundaries {
        boundaries = captures_followed_by(text, &PERIOD, &INITIAL_SURNAME);
    }
    if boundaries.len() < config.min_sentence_boundaries {
        return None;
    }

    let mut parts = Vec::new();
    let mut last_end = 0;
    for caps in &boundaries {
        let end = caps.get(0).unwrap().end();
        if char_len(&text[last_end..end]) >= config.blob_span_min_chars {
            parts.push(text[last_end..end].trim());
            last_end = end;
        }
    }
    parts.push(text[last_end..].trim());

    Some(
        parts
            .into_iter()
            .filter(|p| char_len(p) >= config.blob_fragment_min_chars)
            .map(str::to_string)
            .collect(),
    )
}
