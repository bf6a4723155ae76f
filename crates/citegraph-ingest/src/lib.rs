use std::path::PathBuf;

use thiserror::Error;

pub mod corpus;
pub mod store;

pub use corpus::{PaperSource, REFERENCE_FILENAMES, discover_papers};
pub use store::{
    DONE_MARKER, process_corpus, process_paper, reference_file_name, render_reference_list,
};

// Re-export domain types for convenience
pub use citegraph_core::ReferenceEntry;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corpus directory {} does not exist", path.display())]
    MissingCorpus { path: PathBuf },
    #[error("no References.txt files found under {}", path.display())]
    EmptyCorpus { path: PathBuf },
}

/// Progress events emitted while processing a corpus.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Discovery finished; `total` papers will be processed.
    Started { total: usize },
    Processing {
        index: usize,
        total: usize,
        paper: String,
    },
    Written {
        index: usize,
        total: usize,
        paper: String,
        entries: usize,
        /// True when no entry survived and the original text was written.
        fallback: bool,
    },
    Failed {
        index: usize,
        total: usize,
        paper: String,
        message: String,
    },
}

/// What happened to one paper during a corpus run.
#[derive(Debug)]
pub enum PaperOutcome {
    Written {
        paper: String,
        path: PathBuf,
        entries: usize,
        fallback: bool,
    },
    Failed {
        paper: String,
        error: IngestError,
    },
}

/// Summary of a [`process_corpus`] run.
#[derive(Debug, Default)]
pub struct CorpusReport {
    pub outcomes: Vec<PaperOutcome>,
    /// Location of the completion marker.
    pub marker: PathBuf,
}

impl CorpusReport {
    /// Papers whose reference list was written.
    pub fn processed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PaperOutcome::Written { .. }))
            .count()
    }

    pub fn failed(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                PaperOutcome::Failed { paper, .. } => Some(paper.as_str()),
                PaperOutcome::Written { .. } => None,
            })
            .collect()
    }

    /// Papers that fell back to their unprocessed text.
    pub fn fallbacks(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PaperOutcome::Written { fallback: true, .. }))
            .count()
    }

    pub fn total_entries(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                PaperOutcome::Written { entries, .. } => *entries,
                PaperOutcome::Failed { .. } => 0,
            })
            .sum()
    }
}
