use std::path::PathBuf;

use thiserror::Error;

pub mod analysis;
pub mod builder;
pub mod citations;
pub mod resolver;

pub use analysis::{FuzzyMatch, GraphAnalysis, analyze, fuzzy_matches};
pub use builder::{assemble_graph, build_graph, build_graph_from_files};
pub use citations::{CitationConfig, extract, extract_with_config, title_from_reference};
pub use resolver::{IdentifierTable, ReferenceFile, canonical_name, discover_reference_files};
// Re-export domain types from core (canonical definitions live there)
pub use citegraph_core::{CitationEdge, EdgeKind, Graph, PaperSummary};

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("references directory {} does not exist", path.display())]
    MissingCorpus { path: PathBuf },
    #[error("no *{suffix} files found in {}", path.display())]
    EmptyCorpus { path: PathBuf, suffix: String },
}
