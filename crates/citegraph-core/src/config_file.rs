use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub paths: Option<PathsConfig>,
    pub segmentation: Option<SegmentationConfig>,
    pub citations: Option<CitationsConfig>,
    pub export: Option<ExportConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Root of the per-paper section directories (input of `references`).
    pub sections_dir: Option<String>,
    /// Where per-paper reference lists are written and read back by `graph`.
    pub references_dir: Option<String>,
    /// Where `paper_graph.json` and `paper_graph.dot` are written.
    pub graph_dir: Option<String>,
}

/// Segmentation and validation thresholds. See `ParsingConfig` for meanings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    pub min_bracket_markers: Option<usize>,
    pub bare_run_min_numbers: Option<usize>,
    pub bare_run_min_ratio: Option<f64>,
    pub numbered_run_min_matches: Option<usize>,
    pub numbered_run_min_ratio: Option<f64>,
    pub line_recheck_min_numbers: Option<usize>,
    pub line_recheck_min_ratio: Option<f64>,
    pub long_line_chars: Option<usize>,
    pub min_line_chars: Option<usize>,
    pub min_line_candidates: Option<usize>,
    pub min_sentence_boundaries: Option<usize>,
    pub blob_span_min_chars: Option<usize>,
    pub blob_fragment_min_chars: Option<usize>,
    pub min_entry_chars: Option<usize>,
    pub bracket_marker_regex: Option<String>,
    pub heading_regex: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CitationsConfig {
    pub title_min_chars: Option<usize>,
    pub venue_span_max_chars: Option<usize>,
    pub min_citation_chars: Option<usize>,
    pub reference_suffix: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    pub internal_label_chars: Option<usize>,
    pub external_label_chars: Option<usize>,
    pub min_external_citations: Option<usize>,
}

/// Platform config directory path: `<config_dir>/citegraph/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("citegraph").join("config.toml"))
}

/// Load config by cascading CWD `.citegraph.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".citegraph.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    try_load_from_path(path).ok()
}

/// Strict variant of [`load_from_path`] for explicitly requested files.
pub fn try_load_from_path(path: &Path) -> Result<ConfigFile, CoreError> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|source| CoreError::Config {
        path: path.display().to_string(),
        source,
    })
}

/// Field-level overlay: the overlay section's value wins when present.
fn pick<S, T>(base: &Option<S>, overlay: &Option<S>, field: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay
        .as_ref()
        .and_then(&field)
        .or_else(|| base.as_ref().and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (bp, op) = (&base.paths, &overlay.paths);
    let (bs, os) = (&base.segmentation, &overlay.segmentation);
    let (bc, oc) = (&base.citations, &overlay.citations);
    let (be, oe) = (&base.export, &overlay.export);

    ConfigFile {
        paths: Some(PathsConfig {
            sections_dir: pick(bp, op, |p| p.sections_dir.clone()),
            references_dir: pick(bp, op, |p| p.references_dir.clone()),
            graph_dir: pick(bp, op, |p| p.graph_dir.clone()),
        }),
        segmentation: Some(SegmentationConfig {
            min_bracket_markers: pick(bs, os, |s| s.min_bracket_markers),
            bare_run_min_numbers: pick(bs, os, |s| s.bare_run_min_numbers),
            bare_run_min_ratio: pick(bs, os, |s| s.bare_run_min_ratio),
            numbered_run_min_matches: pick(bs, os, |s| s.numbered_run_min_matches),
            numbered_run_min_ratio: pick(bs, os, |s| s.numbered_run_min_ratio),
            line_recheck_min_numbers: pick(bs, os, |s| s.line_recheck_min_numbers),
            line_recheck_min_ratio: pick(bs, os, |s| s.line_recheck_min_ratio),
            long_line_chars: pick(bs, os, |s| s.long_line_chars),
            min_line_chars: pick(bs, os, |s| s.min_line_chars),
            min_line_candidates: pick(bs, os, |s| s.min_line_candidates),
            min_sentence_boundaries: pick(bs, os, |s| s.min_sentence_boundaries),
            blob_span_min_chars: pick(bs, os, |s| s.blob_span_min_chars),
            blob_fragment_min_chars: pick(bs, os, |s| s.blob_fragment_min_chars),
            min_entry_chars: pick(bs, os, |s| s.min_entry_chars),
            bracket_marker_regex: pick(bs, os, |s| s.bracket_marker_regex.clone()),
            heading_regex: pick(bs, os, |s| s.heading_regex.clone()),
        }),
        citations: Some(CitationsConfig {
            title_min_chars: pick(bc, oc, |c| c.title_min_chars),
            venue_span_max_chars: pick(bc, oc, |c| c.venue_span_max_chars),
            min_citation_chars: pick(bc, oc, |c| c.min_citation_chars),
            reference_suffix: pick(bc, oc, |c| c.reference_suffix.clone()),
        }),
        export: Some(ExportConfig {
            internal_label_chars: pick(be, oe, |e| e.internal_label_chars),
            external_label_chars: pick(be, oe, |e| e.external_label_chars),
            min_external_citations: pick(be, oe, |e| e.min_external_citations),
        }),
    }
}
