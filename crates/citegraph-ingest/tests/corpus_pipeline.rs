//! End-to-end tests for `process_corpus` over a temporary corpus.
//!
//! Each test builds a `paper_sections`-style tree with one directory per paper
//! and checks what lands in the output directory.

use std::fs;
use std::path::Path;

use citegraph_ingest::{
    DONE_MARKER, IngestError, PaperOutcome, ProgressEvent, process_corpus,
};
use citegraph_parsing::{ParsingConfig, is_valid_reference};

const NUMBERED: &str = "References\n\
1. Alice, B. Learning to segment references. Proc. Venue, 2019.\n\
2. Carol, D. Graphs of citations. Journal of Things, 2020.\n\
3. Dave, E. A third paper. arXiv:1909.11588, 2021.\n\
4. Erin, F. Forthcoming work on parsing. To appear.\n";

const BRACKETED: &str = "[1] A. Author. First paper title. In Proc. 2018.\n\
[2] B. Author. Second paper title, with a line that\n\
wraps onto the next one. 2019.\n\
[3] C. Author. Third paper title. 2020.\n";

const NOISE: &str = "figure 3 caption text\nno references here";

fn write_paper(root: &Path, name: &str, file: &str, content: &[u8]) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), content).unwrap();
}

fn corpus() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let sections = dir.path().join("paper_sections");
    write_paper(&sections, "1909.11588_Alpha_sections", "References.txt", NUMBERED.as_bytes());
    write_paper(&sections, "2001.00001_Beta_sections", "REFERENCES.txt", BRACKETED.as_bytes());
    write_paper(&sections, "Gamma_sections", "References.txt", NOISE.as_bytes());
    dir
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

#[test]
fn writes_one_list_per_paper_and_marker() {
    let dir = corpus();
    let out = dir.path().join("paper_references");
    let report = process_corpus(
        &dir.path().join("paper_sections"),
        &out,
        &ParsingConfig::default(),
        |_| {},
    )
    .unwrap();

    assert_eq!(report.processed(), 3);
    assert!(report.failed().is_empty());
    assert_eq!(report.fallbacks(), 1);

    let alpha = fs::read_to_string(out.join("1909.11588_Alpha_sections_references.txt")).unwrap();
    assert_eq!(alpha.lines().count(), 4);
    assert!(alpha.starts_with("1. Alice, B."));

    let beta = fs::read_to_string(out.join("2001.00001_Beta_sections_references.txt")).unwrap();
    assert_eq!(beta.lines().count(), 3);
    assert!(beta.contains("that wraps onto the next one. 2019."));

    // Nothing valid: the original text is kept
    let gamma = fs::read_to_string(out.join("Gamma_sections_references.txt")).unwrap();
    assert_eq!(gamma, format!("{NOISE}\n"));

    let marker = fs::read_to_string(out.join(DONE_MARKER)).unwrap();
    assert_eq!(marker, "Done. Processed 3 files.");
}

#[test]
fn written_entries_pass_validation() {
    let dir = corpus();
    let out = dir.path().join("paper_references");
    let config = ParsingConfig::default();
    let report = process_corpus(&dir.path().join("paper_sections"), &out, &config, |_| {}).unwrap();

    for outcome in &report.outcomes {
        let PaperOutcome::Written { path, fallback: false, .. } = outcome else {
            continue;
        };
        for line in fs::read_to_string(path).unwrap().lines() {
            assert!(is_valid_reference(line, &config), "invalid line {line:?}");
        }
    }
}

#[test]
fn rerun_is_byte_identical() {
    let dir = corpus();
    let input = dir.path().join("paper_sections");
    let out = dir.path().join("paper_references");
    let config = ParsingConfig::default();

    process_corpus(&input, &out, &config, |_| {}).unwrap();
    let first = snapshot(&out);
    process_corpus(&input, &out, &config, |_| {}).unwrap();
    assert_eq!(first, snapshot(&out));
}

#[test]
fn directory_named_like_reference_file_is_ignored() {
    let dir = corpus();
    let input = dir.path().join("paper_sections");
    fs::create_dir_all(input.join("Broken_sections/References.txt")).unwrap();
    fs::write(input.join("Broken_sections/REFERENCES.txt"), "fallback").unwrap();
    let out = dir.path().join("paper_references");

    let events = std::cell::RefCell::new(Vec::new());
    let report = process_corpus(&input, &out, &ParsingConfig::default(), |e| {
        events.borrow_mut().push(e)
    })
    .unwrap();

    assert_eq!(report.processed(), 4);
    assert!(report.failed().is_empty());
    assert!(out.join("Broken_sections_references.txt").exists());

    let written = events
        .borrow()
        .iter()
        .filter(|e| matches!(e, ProgressEvent::Written { .. }))
        .count();
    assert_eq!(written, 4);
}

#[cfg(unix)]
#[test]
fn unreadable_paper_does_not_abort_run() {
    use std::os::unix::fs::PermissionsExt;

    let dir = corpus();
    let input = dir.path().join("paper_sections");
    write_paper(&input, "Locked_sections", "References.txt", b"secret 2020 text");
    let locked = input.join("Locked_sections/References.txt");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read(&locked).is_ok() {
        // Running as root: permissions are not enforced
        return;
    }
    let out = dir.path().join("paper_references");

    let report = process_corpus(&input, &out, &ParsingConfig::default(), |_| {}).unwrap();
    assert_eq!(report.processed(), 3);
    assert_eq!(report.failed(), vec!["Locked_sections"]);
    assert!(!out.join("Locked_sections_references.txt").exists());
    assert_eq!(
        fs::read_to_string(out.join(DONE_MARKER)).unwrap(),
        "Done. Processed 3 files."
    );
}

#[test]
fn missing_corpus_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("paper_references");
    let err = process_corpus(
        &dir.path().join("paper_sections"),
        &out,
        &ParsingConfig::default(),
        |_| {},
    )
    .unwrap_err();
    assert!(matches!(err, IngestError::MissingCorpus { .. }));
    assert!(!out.exists());
}
