//! Where diff text comes from.
//!
//! The parser accepts unified diff text from anywhere, so the provider is a
//! trait: a directory pair today, a version-control subprocess behind the
//! same seam tomorrow.

use std::path::PathBuf;

use crate::compare::compare_trees;
use crate::tree::{TreeError, read_tree};

/// A provider of unified diff text.
pub trait DiffSource {
    fn diff(&self) -> Result<String, TreeError>;

    /// Short human-readable description of where the diff comes from.
    fn label(&self) -> String;
}

/// Produces a diff by comparing two directory snapshots, the layout a
/// diff-editor invocation hands us.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    left: PathBuf,
    right: PathBuf,
}

impl DirectorySource {
    pub fn new(left: impl Into<PathBuf>, right: impl Into<PathBuf>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

impl DiffSource for DirectorySource {
    fn diff(&self) -> Result<String, TreeError> {
        let left = read_tree(&self.left)?;
        let right = read_tree(&self.right)?;
        Ok(compare_trees(&left, &right))
    }

    fn label(&self) -> String {
        format!("{} -> {}", self.left.display(), self.right.display())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use similar_asserts::assert_eq;

    #[test]
    fn directory_source_diffs_two_trees() {
        let left = tempfile::tempdir().unwrap();
        let right = tempfile::tempdir().unwrap();
        fs::write(left.path().join("f.txt"), "a\n").unwrap();
        fs::write(right.path().join("f.txt"), "b\n").unwrap();

        let source = DirectorySource::new(left.path(), right.path());
        let diff = source.diff().unwrap();
        assert!(diff.contains("diff --git a/f.txt b/f.txt"));
        assert!(diff.contains("-a\n+b\n"));
    }

    #[test]
    fn identical_trees_diff_to_nothing() {
        let left = tempfile::tempdir().unwrap();
        let right = tempfile::tempdir().unwrap();
        fs::write(left.path().join("f.txt"), "same\n").unwrap();
        fs::write(right.path().join("f.txt"), "same\n").unwrap();

        let source = DirectorySource::new(left.path(), right.path());
        assert_eq!(source.diff().unwrap(), "");
    }
}
