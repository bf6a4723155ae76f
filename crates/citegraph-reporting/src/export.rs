use std::fs;
use std::path::{Path, PathBuf};

use citegraph_core::config_file;
use citegraph_core::text_utils::truncate_chars;
use citegraph_core::{Graph, is_identifier};

use crate::ExportError;

/// Diagram size and labelling limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Internal node labels are cut after this many characters (default: 50).
    pub internal_label_chars: usize,
    /// External node labels are cut after this many characters (default: 40).
    pub external_label_chars: usize,
    /// External targets need strictly more citations than this to be drawn
    /// (default: 1).
    pub min_external_citations: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            internal_label_chars: 50,
            external_label_chars: 40,
            min_external_citations: 1,
        }
    }
}

impl ExportConfig {
    pub fn from_file_config(file: &config_file::ExportConfig) -> Self {
        let d = Self::default();
        Self {
            internal_label_chars: file.internal_label_chars.unwrap_or(d.internal_label_chars),
            external_label_chars: file.external_label_chars.unwrap_or(d.external_label_chars),
            min_external_citations: file
                .min_external_citations
                .unwrap_or(d.min_external_citations),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Dot,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Json, ExportFormat::Dot];

    pub fn file_name(self) -> &'static str {
        match self {
            ExportFormat::Json => "paper_graph.json",
            ExportFormat::Dot => "paper_graph.dot",
        }
    }
}

/// Pretty-printed `{"papers": {...}, "edges": [...]}` document.
pub fn export_json(graph: &Graph) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(graph)?)
}

fn dot_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Render the graph as a Graphviz digraph.
///
/// Every corpus paper is drawn. External targets appear only when cited more
/// than `min_external_citations` times, and bare identifiers never do.
pub fn export_dot(graph: &Graph, config: &ExportConfig) -> String {
    let cited_counts = graph.cited_counts();
    let shown_external = |target: &str| {
        !graph.is_internal(target)
            && !is_identifier(target)
            && cited_counts.get(target).copied().unwrap_or(0) > config.min_external_citations
    };

    let mut out = String::new();
    out.push_str("digraph PaperGraph {\n");
    out.push_str("  rankdir=LR;\n");
    out.push_str("  node [shape=box];\n\n");

    out.push_str("  // Corpus papers\n");
    for (name, summary) in &graph.papers {
        let label = format!(
            "{}\\n(cited {}x | {} refs)",
            dot_escape(&truncate_chars(name, config.internal_label_chars)),
            summary.inbound_citations,
            summary.citations.len()
        );
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\", style=filled, fillcolor=lightblue];\n",
            dot_escape(name),
            label
        ));
    }
    out.push('\n');

    out.push_str("  // External papers\n");
    for (target, count) in &cited_counts {
        if !shown_external(*target) {
            continue;
        }
        let label = format!(
            "{}\\n(cited {}x)",
            dot_escape(&truncate_chars(target, config.external_label_chars)),
            count
        );
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\", style=filled, fillcolor=lightyellow];\n",
            dot_escape(target),
            label
        ));
    }
    out.push('\n');

    out.push_str("  // Internal citations\n");
    for edge in graph.internal_edges() {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\" [color=blue, penwidth=2];\n",
            dot_escape(&edge.from),
            dot_escape(&edge.to)
        ));
    }
    out.push('\n');

    out.push_str("  // External citations\n");
    for edge in graph.external_edges().filter(|e| shown_external(e.to.as_str())) {
        out.push_str(&format!(
            "  \"{}\" -> \"{}\" [color=gray];\n",
            dot_escape(&edge.from),
            dot_escape(&edge.to)
        ));
    }

    out.push_str("}\n");
    out
}

/// Render `format` and write it into `dir`, overwriting any previous file.
pub fn write_export(
    graph: &Graph,
    format: ExportFormat,
    dir: &Path,
    config: &ExportConfig,
) -> Result<PathBuf, ExportError> {
    let content = match format {
        ExportFormat::Json => export_json(graph)?,
        ExportFormat::Dot => export_dot(graph, config),
    };

    fs::create_dir_all(dir)?;
    let path = dir.join(format.file_name());
    fs::write(&path, content)?;
    tracing::info!(path = %path.display(), ?format, "graph exported");
    Ok(path)
}

/// Write every export format into `dir`.
pub fn write_all(graph: &Graph, dir: &Path, config: &ExportConfig) -> Result<Vec<PathBuf>, ExportError> {
    ExportFormat::ALL
        .into_iter()
        .map(|format| write_export(graph, format, dir, config))
        .collect()
}
