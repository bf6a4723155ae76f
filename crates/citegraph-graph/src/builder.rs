use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use citegraph_core::{CitationEdge, Graph, PaperSummary, read_lossy};

use crate::GraphError;
use crate::citations::{CitationConfig, extract_with_config};
use crate::resolver::{IdentifierTable, ReferenceFile, discover_reference_files};

/// Build the citation graph from every reference file in `dir`.
pub fn build_graph(dir: &Path, config: &CitationConfig) -> Result<Graph, GraphError> {
    let files = discover_reference_files(dir, &config.reference_suffix)?;
    tracing::info!(dir = %dir.display(), papers = files.len(), "building citation graph");
    Ok(build_graph_from_files(&files, config))
}

/// Build the graph from already discovered files.
///
/// The identifier table is built once from `files`. A file that cannot be read
/// is logged and left out of the graph.
pub fn build_graph_from_files(files: &[ReferenceFile], config: &CitationConfig) -> Graph {
    let table = IdentifierTable::from_reference_files(files);
    tracing::debug!(identifiers = table.len(), "identifier table ready");

    let mut papers: Vec<(String, BTreeSet<String>)> = Vec::with_capacity(files.len());
    let mut seen = BTreeSet::new();
    for file in files {
        if !seen.insert(file.name.as_str()) {
            tracing::warn!(paper = %file.name, path = %file.path.display(), "duplicate paper name, skipping");
            continue;
        }
        let content = match read_lossy(&file.path) {
            Ok(content) => content,
            Err(error) => {
                tracing::warn!(paper = %file.name, %error, "skipping paper");
                continue;
            }
        };
        let citations = extract_with_config(&content, &table, config);
        tracing::info!(paper = %file.name, count = citations.len(), "extracted citations");
        papers.push((file.name.clone(), citations));
    }

    assemble_graph(papers)
}

/// Assemble papers and their citation sets into a [`Graph`].
///
/// Edges follow paper order, then citation order. Inbound counts only see
/// edges between corpus papers.
pub fn assemble_graph(papers: Vec<(String, BTreeSet<String>)>) -> Graph {
    let names: BTreeSet<&str> = papers.iter().map(|(name, _)| name.as_str()).collect();

    let mut edges = Vec::new();
    let mut inbound: BTreeMap<String, usize> = BTreeMap::new();
    for (name, citations) in &papers {
        for target in citations {
            if names.contains(target.as_str()) {
                *inbound.entry(target.clone()).or_insert(0) += 1;
            }
            edges.push(CitationEdge::cites(name.as_str(), target.as_str()));
        }
    }

    let papers = papers
        .into_iter()
        .map(|(name, citations)| {
            let summary = PaperSummary {
                name: name.clone(),
                inbound_citations: inbound.get(&name).copied().unwrap_or(0),
                outbound_citations: citations.len(),
                citations: citations.into_iter().collect(),
            };
            (name, summary)
        })
        .collect();

    Graph { papers, edges }
}
