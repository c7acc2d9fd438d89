//! Loads a directory into the path-to-content map the comparator and
//! applier consume.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use error_set::error_set;
use walkdir::WalkDir;

error_set! {
    /// Errors from reading a file tree off disk
    TreeError := {
        #[display("Failed to walk {root}: {message}")]
        WalkFailed { root: String, message: String },
        #[display("Failed to read {path}: {message}")]
        ReadFailed { path: String, message: String },
    }
}

/// Read every regular file under `root` into a map keyed by relative path.
///
/// Paths use `/` separators regardless of platform so they line up with
/// the `a/<path>` and `b/<path>` forms in diff headers. Contents must be
/// UTF-8; this tool works on text.
pub fn read_tree(root: &Path) -> Result<BTreeMap<String, String>, TreeError> {
    let mut files = BTreeMap::new();

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|err| TreeError::WalkFailed {
            root: root.display().to_string(),
            message: err.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel_path = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let content = fs::read_to_string(entry.path()).map_err(|err| TreeError::ReadFailed {
            path: entry.path().display().to_string(),
            message: err.to_string(),
        })?;
        files.insert(rel_path, content);
    }

    log::debug!("read {} files under {}", files.len(), root.display());
    Ok(files)
}
