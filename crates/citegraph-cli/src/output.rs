use std::io::Write;
use std::path::{Path, PathBuf};

use citegraph_core::text_utils::truncate_chars;
use citegraph_graph::GraphAnalysis;
use citegraph_ingest::{CorpusReport, PaperOutcome};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn print_header(w: &mut dyn Write, title: &str, color: ColorMode) -> std::io::Result<()> {
    let sep = "=".repeat(80);
    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{}", title.bold())?;
        writeln!(w, "{}", sep.bold())?;
    } else {
        writeln!(w, "{}", sep)?;
        writeln!(w, "{}", title)?;
        writeln!(w, "{}", sep)?;
    }
    Ok(())
}

/// Print the outcome of the `references` stage.
pub fn print_corpus_summary(
    w: &mut dyn Write,
    report: &CorpusReport,
    output_dir: &Path,
    color: ColorMode,
) -> std::io::Result<()> {
    print_header(w, "REFERENCE LISTS", color)?;
    writeln!(w, "  Papers processed: {}", report.processed())?;
    writeln!(w, "  Reference entries written: {}", report.total_entries())?;

    let fallbacks = report.fallbacks();
    if fallbacks > 0 {
        let msg = format!("Kept original text (nothing valid found): {}", fallbacks);
        if color.enabled() {
            writeln!(w, "  {}", msg.yellow())?;
        } else {
            writeln!(w, "  {}", msg)?;
        }
    }

    for outcome in &report.outcomes {
        if let PaperOutcome::Failed { paper, error } = outcome {
            if color.enabled() {
                writeln!(w, "  {} {}: {}", "Failed:".red(), paper, error)?;
            } else {
                writeln!(w, "  Failed: {}: {}", paper, error)?;
            }
        }
    }

    writeln!(w, "  Output: {}", output_dir.display())?;
    Ok(())
}

/// Print graph statistics, internal links, top external targets and
/// per-paper reference counts.
pub fn print_analysis(
    w: &mut dyn Write,
    analysis: &GraphAnalysis,
    color: ColorMode,
) -> std::io::Result<()> {
    print_header(w, "GRAPH ANALYSIS", color)?;
    writeln!(w)?;
    writeln!(w, "Total papers: {}", analysis.total_papers)?;
    writeln!(w, "Total citation edges: {}", analysis.total_edges)?;

    writeln!(w)?;
    writeln!(
        w,
        "Internal citations (papers citing each other): {}",
        analysis.internal_edges.len()
    )?;
    if !analysis.internal_edges.is_empty() {
        writeln!(w)?;
        writeln!(w, "Paper connections:")?;
        for edge in &analysis.internal_edges {
            writeln!(w, "  {}", edge.from)?;
            if color.enabled() {
                writeln!(w, "    {} {}", "->".blue(), edge.to)?;
            } else {
                writeln!(w, "    -> {}", edge.to)?;
            }
        }
    }

    if !analysis.top_external.is_empty() {
        writeln!(w)?;
        writeln!(w, "Most cited external papers (not in our set):")?;
        for (target, count) in &analysis.top_external {
            let tag = format!("[{}x]", count);
            if color.enabled() {
                writeln!(w, "  {} {}", tag.yellow(), truncate_chars(target, 100))?;
            } else {
                writeln!(w, "  {} {}", tag, truncate_chars(target, 100))?;
            }
        }
    }

    if !analysis.fuzzy_matches.is_empty() {
        writeln!(w)?;
        writeln!(w, "Possible matches to our papers (not linked):")?;
        for m in &analysis.fuzzy_matches {
            let line = format!("'{}' ~ {}", truncate_chars(&m.target, 60), m.paper);
            if color.enabled() {
                writeln!(w, "  {}", line.dimmed())?;
            } else {
                writeln!(w, "  {}", line)?;
            }
        }
    }

    writeln!(w)?;
    writeln!(w, "Papers by number of references:")?;
    for (name, refs) in &analysis.papers_by_references {
        writeln!(w, "  [{}] {}", refs, name)?;
    }
    Ok(())
}

/// List the files written by the exporters.
pub fn print_exports(w: &mut dyn Write, paths: &[PathBuf], color: ColorMode) -> std::io::Result<()> {
    writeln!(w)?;
    for path in paths {
        if color.enabled() {
            writeln!(w, "{} {}", "Exported:".green(), path.display())?;
        } else {
            writeln!(w, "Exported: {}", path.display())?;
        }
    }
    Ok(())
}
