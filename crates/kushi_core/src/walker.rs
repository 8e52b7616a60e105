//! File discovery for directory batches.
//!
//! Uses `ignore::WalkBuilder` so `.gitignore` files are respected and
//! hidden files skipped, and prunes excluded directories during the walk
//! rather than filtering afterwards. The per-file syntax check happens
//! later, in the engine, because it depends on the registry.

use std::path::{Path, PathBuf};

use globset::GlobSet;
use ignore::WalkBuilder;
use tracing::{debug, info};

/// Walks a directory and returns every file that is not excluded,
/// sorted by path.
pub(crate) fn discover_files(root: &Path, exclude: Option<&GlobSet>) -> Vec<PathBuf> {
    let mut builder = WalkBuilder::new(root);
    builder.follow_links(false);

    if let Some(set) = exclude {
        let set = set.clone();
        builder.filter_entry(move |entry| !set.is_match(entry.path()));
    }

    let mut files = Vec::new();
    for entry in builder.build() {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_some_and(|ft| ft.is_file()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => debug!("walk error: {e}"),
        }
    }

    files.sort();
    info!(root = %root.display(), count = files.len(), "discovered files");
    files
}

#[cfg(test)]
mod tests {
    use std::fs;

    use globset::{Glob, GlobSetBuilder};
    use tempfile::TempDir;

    use super::*;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::write(root.join("a.css"), "a{}").unwrap();
        fs::write(root.join("b.scss"), "b{}").unwrap();
        fs::write(root.join(".hidden.css"), "h{}").unwrap();

        let nested = root.join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("c.css"), "c{}").unwrap();

        let vendor = root.join("vendor");
        fs::create_dir(&vendor).unwrap();
        fs::write(vendor.join("d.css"), "d{}").unwrap();

        temp
    }

    fn excluding(pattern: &str) -> GlobSet {
        let mut builder = GlobSetBuilder::new();
        builder.add(Glob::new(pattern).unwrap());
        builder.build().unwrap()
    }

    #[test]
    fn test_discovers_files_recursively() {
        let temp = create_test_tree();
        let files = discover_files(temp.path(), None);

        assert!(files.iter().any(|f| f.ends_with("a.css")));
        assert!(files.iter().any(|f| f.ends_with("nested/c.css")));
    }

    #[test]
    fn test_skips_hidden_files() {
        let temp = create_test_tree();
        let files = discover_files(temp.path(), None);

        assert!(!files.iter().any(|f| {
            f.file_name()
                .is_some_and(|n| n.to_string_lossy() == ".hidden.css")
        }));
    }

    #[test]
    fn test_excluded_directory_is_pruned() {
        let temp = create_test_tree();
        let exclude = excluding("**/vendor/**");
        let files = discover_files(temp.path(), Some(&exclude));

        assert!(!files.iter().any(|f| f.to_string_lossy().contains("vendor")));
        assert!(files.iter().any(|f| f.ends_with("a.css")));
    }

    #[test]
    fn test_results_are_sorted() {
        let temp = create_test_tree();
        let files = discover_files(temp.path(), None);

        let mut sorted = files.clone();
        sorted.sort();
        assert_eq!(files, sorted);
    }
}
