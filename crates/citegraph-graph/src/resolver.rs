use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use citegraph_core::identifiers::{leading_identifier, strip_identifier_prefix};

use crate::GraphError;

/// A per-paper reference list found in the references directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFile {
    pub path: PathBuf,
    /// Canonical paper name derived from the filename.
    pub name: String,
    /// Leading identifier token of the filename, if any.
    pub identifier: Option<String>,
}

impl ReferenceFile {
    pub fn from_file_name(path: PathBuf, suffix: &str) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let name = canonical_name(file_name, suffix);
        let identifier = leading_identifier(file_name).map(str::to_string);
        Some(Self {
            path,
            name,
            identifier,
        })
    }
}

/// Derive a paper's canonical name from its reference list filename.
///
/// `1909.11588_Paper_X_sections_references.txt` → `Paper_X`. Without an
/// identifier prefix only the suffix is removed.
pub fn canonical_name(file_name: &str, suffix: &str) -> String {
    let strip_suffix = |s: &str| -> Option<String> {
        s.strip_suffix(suffix)
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
    };

    match strip_identifier_prefix(file_name) {
        Some(rest) => strip_suffix(rest).unwrap_or_else(|| rest.to_string()),
        None => strip_suffix(file_name).unwrap_or_else(|| file_name.to_string()),
    }
}

/// List the reference files in `dir` (not recursive), sorted by filename.
pub fn discover_reference_files(dir: &Path, suffix: &str) -> Result<Vec<ReferenceFile>, GraphError> {
    if !dir.is_dir() {
        return Err(GraphError::MissingCorpus {
            path: dir.to_path_buf(),
        });
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(suffix))
        })
        .collect();
    paths.sort();

    let files: Vec<ReferenceFile> = paths
        .into_iter()
        .filter_map(|path| ReferenceFile::from_file_name(path, suffix))
        .collect();

    if files.is_empty() {
        return Err(GraphError::EmptyCorpus {
            path: dir.to_path_buf(),
            suffix: suffix.to_string(),
        });
    }
    Ok(files)
}

/// Identifier → canonical name lookup, built once per run and read-only after.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierTable {
    names: BTreeMap<String, String>,
}

impl IdentifierTable {
    /// Table of every reference file that carries an identifier.
    pub fn from_reference_files(files: &[ReferenceFile]) -> Self {
        files
            .iter()
            .filter_map(|f| Some((f.identifier.clone()?, f.name.clone())))
            .collect()
    }

    pub fn resolve(&self, identifier: &str) -> Option<&str> {
        self.names.get(identifier).map(String::as_str)
    }

    /// The mapped name, or the identifier itself when unknown.
    pub fn resolve_or_raw<'a>(&'a self, identifier: &'a str) -> &'a str {
        self.resolve(identifier).unwrap_or(identifier)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(String, String)> for IdentifierTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUFFIX: &str = "_sections_references.txt";

    #[test]
    fn test_canonical_name() {
        assert_eq!(
            canonical_name("1909.11588_Paper_X_sections_references.txt", SUFFIX),
            "Paper_X"
        );
        assert_eq!(canonical_name("2301.12345_Other_Thing", SUFFIX), "Other_Thing");
        assert_eq!(
            canonical_name("No_Identifier_sections_references.txt", SUFFIX),
            "No_Identifier"
        );
        // Nothing left before the suffix: keep the remainder as is
        assert_eq!(
            canonical_name("1909.11588__sections_references.txt", SUFFIX),
            "_sections_references.txt"
        );
    }

    #[test]
    fn test_table_from_files() {
        let files = vec![
            ReferenceFile::from_file_name(
                PathBuf::from("/refs/1909.11588_Paper_X_sections_references.txt"),
                SUFFIX,
            )
            .unwrap(),
            ReferenceFile::from_file_name(
                PathBuf::from("/refs/Plain_sections_references.txt"),
                SUFFIX,
            )
            .unwrap(),
        ];
        let table = IdentifierTable::from_reference_files(&files);
        assert_eq!(table.len(), 1);
        assert_eq!(table.resolve("1909.11588"), Some("Paper_X"));
        assert_eq!(table.resolve_or_raw("2001.00001"), "2001.00001");
        assert_eq!(files[1].identifier, None);
        assert_eq!(files[1].name, "Plain");
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "2001.00002_B_sections_references.txt",
            "1909.11588_A_sections_references.txt",
            "references_processing_done.txt",
            "notes.txt",
        ] {
            fs::write(dir.path().join(name), "1 x").unwrap();
        }
        let names: Vec<_> = discover_reference_files(dir.path(), SUFFIX)
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_discover_missing_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            discover_reference_files(&dir.path().join("absent"), SUFFIX),
            Err(GraphError::MissingCorpus { .. })
        ));
        assert!(matches!(
            discover_reference_files(dir.path(), SUFFIX),
            Err(GraphError::EmptyCorpus { .. })
        ));
    }
}
