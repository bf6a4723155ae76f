use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::IngestError;

/// Bibliography section filenames, in order of preference.
pub const REFERENCE_FILENAMES: [&str; 2] = ["References.txt", "REFERENCES.txt"];

/// One paper directory holding a bibliography section file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperSource {
    /// Basename of the paper directory.
    pub name: String,
    /// The `References.txt` (or `REFERENCES.txt`) inside it.
    pub path: PathBuf,
}

/// Walk `root` recursively and return every paper directory, sorted by path.
///
/// Unreadable directory entries are skipped.
pub fn discover_papers(root: &Path) -> Result<Vec<PaperSource>, IngestError> {
    if !root.is_dir() {
        return Err(IngestError::MissingCorpus {
            path: root.to_path_buf(),
        });
    }

    let papers: Vec<PaperSource> = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir())
        .filter_map(|entry| {
            let dir = entry.path();
            let path = REFERENCE_FILENAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|p| p.is_file())?;
            let name = dir.file_name()?.to_string_lossy().into_owned();
            Some(PaperSource { name, path })
        })
        .collect();

    if papers.is_empty() {
        return Err(IngestError::EmptyCorpus {
            path: root.to_path_buf(),
        });
    }
    Ok(papers)
}
