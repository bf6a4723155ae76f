use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config_file;
pub mod identifiers;
pub mod text_utils;

// Re-export for convenience
pub use identifiers::{is_identifier, leading_identifier};
pub use text_utils::{find_year, has_year_token, normalize_whitespace, read_lossy};

/// One cleaned citation string belonging to a paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    /// Canonical name of the paper whose bibliography this entry came from.
    pub paper: String,
    /// Whitespace-normalized reference text.
    pub text: String,
    /// Leading sequence number (`12.`, `[12]`, `12 `) if one was detected.
    pub number: Option<u32>,
    /// First 19xx/20xx token in the text.
    pub year: Option<u16>,
}

/// A unit of the corpus: one discovered source file and its references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paper {
    pub name: String,
    /// arXiv-style identifier taken from the source filename, if present.
    pub identifier: Option<String>,
    pub references: Vec<ReferenceEntry>,
}

impl Paper {
    pub fn new(name: impl Into<String>, identifier: Option<String>) -> Self {
        Self {
            name: name.into(),
            identifier,
            references: Vec::new(),
        }
    }
}

/// Relation type carried by a [`CitationEdge`]. Only citation is modelled.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Cites,
}

/// Directed citation from a corpus paper to a citation identity.
///
/// `to` is either a resolved canonical paper name or the raw identifier/title
/// that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CitationEdge {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
}

impl CitationEdge {
    pub fn cites(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: EdgeKind::Cites,
        }
    }
}

/// Per-paper entry of the graph's `papers` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperSummary {
    pub name: String,
    pub citations: Vec<String>,
    /// Number of internal edges pointing at this paper.
    pub inbound_citations: usize,
    /// Number of citations extracted from this paper's reference list.
    pub outbound_citations: usize,
}

/// The citation graph: corpus papers keyed by canonical name plus edges.
///
/// Names are value keys; the graph never holds the backing [`Paper`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub papers: BTreeMap<String, PaperSummary>,
    pub edges: Vec<CitationEdge>,
}

impl Graph {
    /// Whether `target` is exactly the canonical name of a corpus paper.
    pub fn is_internal(&self, target: &str) -> bool {
        self.papers.contains_key(target)
    }

    pub fn internal_edges(&self) -> impl Iterator<Item = &CitationEdge> {
        self.edges.iter().filter(|e| self.is_internal(&e.to))
    }

    pub fn external_edges(&self) -> impl Iterator<Item = &CitationEdge> {
        self.edges.iter().filter(|e| !self.is_internal(&e.to))
    }

    /// Number of edges pointing at each target.
    pub fn cited_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for edge in &self.edges {
            *counts.entry(edge.to.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(name: &str) -> PaperSummary {
        PaperSummary {
            name: name.to_string(),
            citations: vec![],
            inbound_citations: 0,
            outbound_citations: 0,
        }
    }

    #[test]
    fn test_internal_external_partition() {
        let mut graph = Graph::default();
        graph.papers.insert("A".into(), summary("A"));
        graph.papers.insert("B".into(), summary("B"));
        graph.edges.push(CitationEdge::cites("A", "B"));
        graph.edges.push(CitationEdge::cites("A", "Some External Title"));
        graph.edges.push(CitationEdge::cites("B", "Some External Title"));

        assert_eq!(graph.internal_edges().count(), 1);
        assert_eq!(graph.external_edges().count(), 2);
        assert_eq!(graph.cited_counts()["Some External Title"], 2);
    }

    #[test]
    fn test_edge_constructor_sets_kind() {
        let edge = CitationEdge::cites("A", "B");
        assert_eq!(edge.kind, EdgeKind::Cites);
    }
}
