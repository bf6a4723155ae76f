use std::cmp::Reverse;
use std::collections::BTreeMap;

use citegraph_core::{CitationEdge, Graph};

/// How many external targets the report lists.
pub const TOP_EXTERNAL_LIMIT: usize = 10;

/// Shortest normalized external target considered for fuzzy matching.
const FUZZY_MIN_CHARS: usize = 10;

/// An unresolved external target that looks like a corpus paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    pub target: String,
    pub paper: String,
}

/// Summary statistics over a built [`Graph`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphAnalysis {
    pub total_papers: usize,
    pub total_edges: usize,
    /// Edges per target, internal and external.
    pub cited_counts: BTreeMap<String, usize>,
    /// Edges whose target is a corpus paper, in graph order.
    pub internal_edges: Vec<CitationEdge>,
    /// External targets cited more than once, most cited first.
    pub top_external: Vec<(String, usize)>,
    /// Papers with their reference counts, most references first.
    pub papers_by_references: Vec<(String, usize)>,
    /// Reported only; edges are never rewritten.
    pub fuzzy_matches: Vec<FuzzyMatch>,
}

pub fn analyze(graph: &Graph) -> GraphAnalysis {
    let cited_counts: BTreeMap<String, usize> = graph
        .cited_counts()
        .into_iter()
        .map(|(target, count)| (target.to_string(), count))
        .collect();

    let mut top_external: Vec<(String, usize)> = cited_counts
        .iter()
        .filter(|(target, count)| **count > 1 && !graph.is_internal(target))
        .map(|(target, count)| (target.clone(), *count))
        .collect();
    // Stable sort over name-ordered input keeps ties alphabetical
    top_external.sort_by_key(|(_, count)| Reverse(*count));
    top_external.truncate(TOP_EXTERNAL_LIMIT);

    let mut papers_by_references: Vec<(String, usize)> = graph
        .papers
        .values()
        .map(|p| (p.name.clone(), p.citations.len()))
        .collect();
    papers_by_references.sort_by_key(|(_, refs)| Reverse(*refs));

    GraphAnalysis {
        total_papers: graph.papers.len(),
        total_edges: graph.edges.len(),
        cited_counts,
        internal_edges: graph.internal_edges().cloned().collect(),
        top_external,
        papers_by_references,
        fuzzy_matches: fuzzy_matches(graph),
    }
}

fn simplify_paper_name(name: &str) -> String {
    name.to_lowercase().replace(['_', '-'], " ")
}

fn simplify_target(target: &str) -> String {
    target.to_lowercase().replace('-', " ")
}

/// External targets whose simplified text appears inside a simplified paper
/// name (`Graph_Neural-Nets` → `graph neural nets`).
///
/// One entry per (target, paper) pair, sorted by target then paper.
pub fn fuzzy_matches(graph: &Graph) -> Vec<FuzzyMatch> {
    let simplified: Vec<(String, &str)> = graph
        .papers
        .keys()
        .map(|name| (simplify_paper_name(name), name.as_str()))
        .collect();

    let mut targets: Vec<&str> = graph.external_edges().map(|e| e.to.as_str()).collect();
    targets.sort_unstable();
    targets.dedup();

    let mut matches = Vec::new();
    for target in targets {
        let simple = simplify_target(target);
        if simple.chars().count() <= FUZZY_MIN_CHARS {
            continue;
        }
        for (paper_simple, paper) in &simplified {
            if paper_simple.contains(&simple) {
                matches.push(FuzzyMatch {
                    target: target.to_string(),
                    paper: paper.to_string(),
                });
            }
        }
    }
    matches
}
