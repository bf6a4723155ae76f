use citegraph_core::config_file::SegmentationConfig;
use regex::Regex;

/// Thresholds and pattern overrides for segmentation and validation.
///
/// Counts are inclusive minimums unless noted. Ratios are strict: a run is
/// sequential when `increments > numbers * ratio`, where `increments` counts
/// adjacent pairs that go up by exactly one.
///
/// Regex fields are `Option<Regex>`: `None` means "use the built-in default".
/// Use [`ParsingConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── bracketed markers ──
    /// Markers (`[Knu84]`, `[12]`, `[Author, 2019]`) needed before the
    /// bracket strategy applies (default: 3).
    pub(crate) min_bracket_markers: usize,
    pub(crate) bracket_marker_re: Option<Regex>,
    /// Leading heading stripped before bracket splitting (default: `REFERENCES`).
    pub(crate) heading_re: Option<Regex>,

    // ── bare "N Author" numbering ──
    pub(crate) bare_run_min_numbers: usize,
    pub(crate) bare_run_min_ratio: f64,

    // ── "N. Author" numbering ──
    pub(crate) numbered_run_min_matches: usize,
    pub(crate) numbered_run_min_ratio: f64,

    // ── line-based strategy ──
    /// Bare-number re-check on the flattened blob before going line by line.
    pub(crate) line_recheck_min_numbers: usize,
    pub(crate) line_recheck_min_ratio: f64,
    /// Lines strictly longer than this are blob-split (default: 350).
    pub(crate) long_line_chars: usize,
    pub(crate) min_line_chars: usize,
    pub(crate) min_line_candidates: usize,

    // ── sentence-boundary blob splitting ──
    pub(crate) min_sentence_boundaries: usize,
    /// A boundary only closes a span at least this long (default: 21).
    pub(crate) blob_span_min_chars: usize,
    /// Split fragments shorter than this are discarded (default: 11).
    pub(crate) blob_fragment_min_chars: usize,

    // ── validation ──
    pub(crate) min_entry_chars: usize,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            min_bracket_markers: 3,
            bracket_marker_re: None,
            heading_re: None,
            bare_run_min_numbers: 4,
            bare_run_min_ratio: 0.5,
            numbered_run_min_matches: 4,
            numbered_run_min_ratio: 0.7,
            line_recheck_min_numbers: 6,
            line_recheck_min_ratio: 0.6,
            long_line_chars: 350,
            min_line_chars: 21,
            min_line_candidates: 3,
            min_sentence_boundaries: 3,
            blob_span_min_chars: 21,
            blob_fragment_min_chars: 11,
            min_entry_chars: 10,
        }
    }
}

impl ParsingConfig {
    /// Minimum normalized length of a kept reference entry.
    pub fn min_entry_chars(&self) -> usize {
        self.min_entry_chars
    }
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with `regex::Error` if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    min_bracket_markers: Option<usize>,
    bracket_marker_re: Option<String>,
    heading_re: Option<String>,
    bare_run_min_numbers: Option<usize>,
    bare_run_min_ratio: Option<f64>,
    numbered_run_min_matches: Option<usize>,
    numbered_run_min_ratio: Option<f64>,
    line_recheck_min_numbers: Option<usize>,
    line_recheck_min_ratio: Option<f64>,
    long_line_chars: Option<usize>,
    min_line_chars: Option<usize>,
    min_line_candidates: Option<usize>,
    min_sentence_boundaries: Option<usize>,
    blob_span_min_chars: Option<usize>,
    blob_fragment_min_chars: Option<usize>,
    min_entry_chars: Option<usize>,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from the `[segmentation]` section of a config file.
    pub fn from_file_config(file: &SegmentationConfig) -> Self {
        Self {
            min_bracket_markers: file.min_bracket_markers,
            bracket_marker_re: file.bracket_marker_regex.clone(),
            heading_re: file.heading_regex.clone(),
            bare_run_min_numbers: file.bare_run_min_numbers,
            bare_run_min_ratio: file.bare_run_min_ratio,
            numbered_run_min_matches: file.numbered_run_min_matches,
            numbered_run_min_ratio: file.numbered_run_min_ratio,
            line_recheck_min_numbers: file.line_recheck_min_numbers,
            line_recheck_min_ratio: file.line_recheck_min_ratio,
            long_line_chars: file.long_line_chars,
            min_line_chars: file.min_line_chars,
            min_line_candidates: file.min_line_candidates,
            min_sentence_boundaries: file.min_sentence_boundaries,
            blob_span_min_chars: file.blob_span_min_chars,
            blob_fragment_min_chars: file.blob_fragment_min_chars,
            min_entry_chars: file.min_entry_chars,
        }
    }

    // ── Patterns ──

    pub fn bracket_marker_regex(mut self, pattern: &str) -> Self {
        self.bracket_marker_re = Some(pattern.to_string());
        self
    }

    pub fn heading_regex(mut self, pattern: &str) -> Self {
        self.heading_re = Some(pattern.to_string());
        self
    }

    // ── Scalars ──

    pub fn min_bracket_markers(mut self, n: usize) -> Self {
        self.min_bracket_markers = Some(n);
        self
    }

    pub fn bare_run(mut self, min_numbers: usize, min_ratio: f64) -> Self {
        self.bare_run_min_numbers = Some(min_numbers);
        self.bare_run_min_ratio = Some(min_ratio);
        self
    }

    pub fn numbered_run(mut self, min_matches: usize, min_ratio: f64) -> Self {
        self.numbered_run_min_matches = Some(min_matches);
        self.numbered_run_min_ratio = Some(min_ratio);
        self
    }

    pub fn line_recheck(mut self, min_numbers: usize, min_ratio: f64) -> Self {
        self.line_recheck_min_numbers = Some(min_numbers);
        self.line_recheck_min_ratio = Some(min_ratio);
        self
    }

    pub fn long_line_chars(mut self, n: usize) -> Self {
        self.long_line_chars = Some(n);
        self
    }

    pub fn min_line_chars(mut self, n: usize) -> Self {
        self.min_line_chars = Some(n);
        self
    }

    pub fn min_line_candidates(mut self, n: usize) -> Self {
        self.min_line_candidates = Some(n);
        self
    }

    pub fn min_sentence_boundaries(mut self, n: usize) -> Self {
        self.min_sentence_boundaries = Some(n);
        self
    }

    pub fn blob_span_min_chars(mut self, n: usize) -> Self {
        self.blob_span_min_chars = Some(n);
        self
    }

    pub fn blob_fragment_min_chars(mut self, n: usize) -> Self {
        self.blob_fragment_min_chars = Some(n);
        self
    }

    pub fn min_entry_chars(mut self, n: usize) -> Self {
        self.min_entry_chars = Some(n);
        self
    }

    /// Compile all string patterns into regexes and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let compile = |opt: Option<String>| -> Result<Option<Regex>, regex::Error> {
            opt.map(|p| Regex::new(&p)).transpose()
        };

        let d = ParsingConfig::default();
        Ok(ParsingConfig {
            min_bracket_markers: self.min_bracket_markers.unwrap_or(d.min_bracket_markers),
            bracket_marker_re: compile(self.bracket_marker_re)?,
            heading_re: compile(self.heading_re)?,
            bare_run_min_numbers: self.bare_run_min_numbers.unwrap_or(d.bare_run_min_numbers),
            bare_run_min_ratio: self.bare_run_min_ratio.unwrap_or(d.bare_run_min_ratio),
            numbered_run_min_matches: self
                .numbered_run_min_matches
                .unwrap_or(d.numbered_run_min_matches),
            numbered_run_min_ratio: self
                .numbered_run_min_ratio
                .unwrap_or(d.numbered_run_min_ratio),
            line_recheck_min_numbers: self
                .line_recheck_min_numbers
                .unwrap_or(d.line_recheck_min_numbers),
            line_recheck_min_ratio: self
                .line_recheck_min_ratio
                .unwrap_or(d.line_recheck_min_ratio),
            long_line_chars: self.long_line_chars.unwrap_or(d.long_line_chars),
            min_line_chars: self.min_line_chars.unwrap_or(d.min_line_chars),
            min_line_candidates: self.min_line_candidates.unwrap_or(d.min_line_candidates),
            min_sentence_boundaries: self
                .min_sentence_boundaries
                .unwrap_or(d.min_sentence_boundaries),
            blob_span_min_chars: self.blob_span_min_chars.unwrap_or(d.blob_span_min_chars),
            blob_fragment_min_chars: self
                .blob_fragment_min_chars
                .unwrap_or(d.blob_fragment_min_chars),
            min_entry_chars: self.min_entry_chars.unwrap_or(d.min_entry_chars),
        })
    }
}
