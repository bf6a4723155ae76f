//! Runs both stages back to back over a temporary corpus.
//!
//! The graph stage reads exactly what the references stage wrote, and a
//! second full run must leave every output file byte-identical.

use std::fs;
use std::path::Path;

use citegraph_graph::{CitationConfig, build_graph};
use citegraph_ingest::process_corpus;
use citegraph_parsing::ParsingConfig;
use citegraph_reporting::{ExportConfig, write_all};

const ALPHA: &str = "References\n\
1. Alice, B. Learning to segment references. Proc. Venue, 2019.\n\
2. Carol, D. Graphs of citations. Journal of Things, 2020.\n\
3. Dave, E. Beta follow-up work. arXiv:2001.00001, 2020.\n\
4. Erin, F. Forthcoming work on parsing. To appear.\n";

const BETA: &str = "[1] A. Author. Original Alpha paper. arXiv:1909.11588, 2019.\n\
[2] B. Author. Graphs of citations. Journal of Things, 2020.\n\
[3] C. Author. Third paper title. 2021.\n";

fn write_paper(root: &Path, name: &str, content: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("References.txt"), content).unwrap();
}

fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| {
            let e = e.unwrap();
            (
                e.file_name().to_string_lossy().into_owned(),
                fs::read(e.path()).unwrap(),
            )
        })
        .collect();
    files.sort();
    files
}

fn run_pipeline(root: &Path) {
    let sections = root.join("paper_sections");
    let references = root.join("paper_references");
    let graph_dir = root.join("paper_graph");

    let report = process_corpus(&sections, &references, &ParsingConfig::default(), |_| {}).unwrap();
    assert_eq!(report.processed(), 2);

    let graph = build_graph(&references, &CitationConfig::default()).unwrap();
    write_all(&graph, &graph_dir, &ExportConfig::default()).unwrap();
}

#[test]
fn graph_stage_reads_reference_stage_output() {
    let dir = tempfile::tempdir().unwrap();
    let sections = dir.path().join("paper_sections");
    write_paper(&sections, "1909.11588_Alpha_sections", ALPHA);
    write_paper(&sections, "2001.00001_Beta_sections", BETA);

    run_pipeline(dir.path());

    let graph = build_graph(&dir.path().join("paper_references"), &CitationConfig::default()).unwrap();
    let names: Vec<_> = graph.papers.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);
    assert!(graph.edges.iter().any(|e| e.from == "Alpha" && e.to == "Beta"));
    assert!(graph.edges.iter().any(|e| e.from == "Beta" && e.to == "Alpha"));
    assert_eq!(graph.internal_edges().count(), 2);
}

#[test]
fn full_rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let sections = dir.path().join("paper_sections");
    write_paper(&sections, "1909.11588_Alpha_sections", ALPHA);
    write_paper(&sections, "2001.00001_Beta_sections", BETA);

    run_pipeline(dir.path());
    let references = snapshot(&dir.path().join("paper_references"));
    let graph = snapshot(&dir.path().join("paper_graph"));
    assert_eq!(
        graph.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>(),
        vec!["paper_graph.dot", "paper_graph.json"]
    );

    run_pipeline(dir.path());
    assert_eq!(snapshot(&dir.path().join("paper_references")), references);
    assert_eq!(snapshot(&dir.path().join("paper_graph")), graph);
}
