use std::fs;
use std::path::{Path, PathBuf};

use citegraph_core::{Paper, ReferenceEntry, leading_identifier, read_lossy};
use citegraph_parsing::{ParsingConfig, extract_entries};

use crate::corpus::{PaperSource, discover_papers};
use crate::{CorpusReport, IngestError, PaperOutcome, ProgressEvent};

/// Completion marker written to the output directory after a corpus run.
pub const DONE_MARKER: &str = "references_processing_done.txt";

/// `<paper>_references.txt`
pub fn reference_file_name(paper: &str) -> String {
    format!("{paper}_references.txt")
}

/// One entry per line. With no surviving entries the original text is kept
/// so a paper never ends up with an empty list.
pub fn render_reference_list(entries: &[ReferenceEntry], original: &str) -> String {
    if entries.is_empty() {
        return format!("{original}\n");
    }
    let mut out = String::new();
    for entry in entries {
        out.push_str(&entry.text);
        out.push('\n');
    }
    out
}

/// Segment, clean and write one paper's reference list into `out_dir`.
///
/// Returns the written path and the paper with its surviving entries.
pub fn process_paper(
    source: &PaperSource,
    out_dir: &Path,
    config: &ParsingConfig,
) -> Result<(PathBuf, Paper), IngestError> {
    let original = read_lossy(&source.path)?;
    let mut paper = Paper::new(
        source.name.as_str(),
        leading_identifier(&source.name).map(str::to_string),
    );
    paper.references = extract_entries(&source.name, &original, config);

    let out_path = out_dir.join(reference_file_name(&paper.name));
    fs::write(&out_path, render_reference_list(&paper.references, &original))?;
    Ok((out_path, paper))
}

/// Process every paper under `input_dir`, writing lists into `output_dir`.
///
/// A failing paper is logged, reported through `progress` and skipped; it
/// never aborts the run. Only a missing or empty corpus is an error, in which
/// case nothing is written.
pub fn process_corpus(
    input_dir: &Path,
    output_dir: &Path,
    config: &ParsingConfig,
    progress: impl Fn(ProgressEvent),
) -> Result<CorpusReport, IngestError> {
    let papers = discover_papers(input_dir)?;
    let total = papers.len();
    tracing::info!(input = %input_dir.display(), total, "processing corpus");
    progress(ProgressEvent::Started { total });

    fs::create_dir_all(output_dir)?;

    let mut outcomes = Vec::with_capacity(total);
    for (index, source) in papers.iter().enumerate() {
        progress(ProgressEvent::Processing {
            index,
            total,
            paper: source.name.clone(),
        });

        match process_paper(source, output_dir, config) {
            Ok((path, paper)) => {
                let entries = paper.references.len();
                let fallback = entries == 0;
                tracing::info!(paper = %source.name, entries, fallback, "wrote reference list");
                progress(ProgressEvent::Written {
                    index,
                    total,
                    paper: source.name.clone(),
                    entries,
                    fallback,
                });
                outcomes.push(PaperOutcome::Written {
                    paper: source.name.clone(),
                    path,
                    entries,
                    fallback,
                });
            }
            Err(error) => {
                tracing::warn!(paper = %source.name, %error, "skipping paper");
                progress(ProgressEvent::Failed {
                    index,
                    total,
                    paper: source.name.clone(),
                    message: error.to_string(),
                });
                outcomes.push(PaperOutcome::Failed {
                    paper: source.name.clone(),
                    error,
                });
            }
        }
    }

    let report = CorpusReport {
        outcomes,
        marker: output_dir.join(DONE_MARKER),
    };
    let processed = report.processed();
    fs::write(&report.marker, format!("Done. Processed {processed} files."))?;
    tracing::info!(processed, failed = total - processed, "corpus done");

    Ok(report)
}
