//! Builds graphs from a temporary references directory.
//!
//! The fixtures mimic what the `references` stage writes: one
//! `<id>_<name>_sections_references.txt` file per paper, one entry per line.

use std::fs;
use std::path::Path;

use citegraph_graph::{CitationConfig, GraphError, analyze, build_graph};

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn corpus() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "1909.11588_PaperX_sections_references.txt",
        "1 Alice, B. Shared external work on graphs. Venue, 2018.\n\
         2 Carol, D. Another cited thing entirely. Journal, 2017.\n",
    );
    write(
        dir.path(),
        "2001.00002_PaperY_sections_references.txt",
        "1 Dan, E. Building on X. arXiv:1909.11588, 2020.\n\
         2 Alice, B. Shared external work on graphs. Venue, 2018.\n\
         3 Unknown preprint arXiv:2105.99999\n",
    );
    write(
        dir.path(),
        "PaperZ_sections_references.txt",
        "Not numbered so only identifiers count: 2001.00002\n",
    );
    write(dir.path(), "references_processing_done.txt", "Done. Processed 3 files.");
    dir
}

#[test]
fn builds_nodes_and_resolves_identifiers() {
    let dir = corpus();
    let graph = build_graph(dir.path(), &CitationConfig::default()).unwrap();

    let names: Vec<_> = graph.papers.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["PaperX", "PaperY", "PaperZ"]);

    // arXiv:1909.11588 resolves to PaperX, 2001.00002 to PaperY
    assert!(graph.papers["PaperY"].citations.contains(&"PaperX".to_string()));
    assert!(graph.papers["PaperZ"].citations.contains(&"PaperY".to_string()));
    assert_eq!(graph.papers["PaperX"].inbound_citations, 1);
    assert_eq!(graph.papers["PaperY"].inbound_citations, 1);

    // Unknown identifiers stay raw
    assert!(graph.papers["PaperY"].citations.contains(&"2105.99999".to_string()));

    for summary in graph.papers.values() {
        assert_eq!(summary.outbound_citations, summary.citations.len());
        let edges = graph.edges.iter().filter(|e| e.from == summary.name).count();
        assert_eq!(edges, summary.citations.len());
    }
}

#[test]
fn shared_external_title_is_top_external() {
    let dir = corpus();
    let graph = build_graph(dir.path(), &CitationConfig::default()).unwrap();
    let analysis = analyze(&graph);

    assert_eq!(
        analysis.top_external.first(),
        Some(&("Shared external work on graphs".to_string(), 2))
    );
    assert_eq!(analysis.internal_edges.len(), 2);
}

#[test]
fn builder_is_deterministic() {
    let dir = corpus();
    let config = CitationConfig::default();
    let first = build_graph(dir.path(), &config).unwrap();
    let second = build_graph(dir.path(), &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn missing_directory_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = build_graph(&dir.path().join("paper_references"), &CitationConfig::default())
        .unwrap_err();
    assert!(matches!(err, GraphError::MissingCorpus { .. }));
}
