//! Reconstructs right-side files from a selection.
//!
//! The core is [`reconstruct`], a pure text transformation: given the parsed
//! change for one file, the left and right contents, and the selection, it
//! produces the content the right side should hold so that only the selected
//! changes remain. [`Applier`] wraps it with the file I/O for a left/right
//! directory pair.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use error_set::error_set;

use crate::model::{ChangeType, FileChange, LineKind};
use crate::selection::SelectionView;

error_set! {
    /// Errors from applying selections to a right-side directory
    ApplyError := {
        #[display("Failed to read {path}: {message}")]
        ReadFailed { path: String, message: String },
        #[display("Failed to write {path}: {message}")]
        WriteFailed { path: String, message: String },
        #[display("Failed to remove {path}: {message}")]
        RemoveFailed { path: String, message: String },
    }
}

/// Outcome of reconstructing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconstructed {
    /// Content the destination file should hold.
    Content(String),
    /// The destination file should not exist.
    Remove,
}

/// Compute what the right side of `file` should contain once only the
/// selected changes are kept.
///
/// Selecting nothing reverts the file to its left content (or removes a
/// purely added file); selecting everything preserves the right content.
/// `left_content` is ignored for added files and `right_content` for
/// deleted ones.
pub fn reconstruct<S: SelectionView>(
    file: &FileChange,
    left_content: &str,
    right_content: &str,
    selection: &S,
) -> Reconstructed {
    match file.change_type {
        ChangeType::Added => reconstruct_added(file, right_content, selection),
        ChangeType::Deleted => reconstruct_deleted(file, left_content, selection),
        ChangeType::Modified | ChangeType::Renamed => {
            Reconstructed::Content(reconstruct_modified(file, left_content, selection))
        }
    }
}

/// An added file keeps exactly the selected addition lines, pulled from
/// the right content by their new-side numbers so the bytes match what
/// is on disk rather than what the diff carried.
fn reconstruct_added<S: SelectionView>(
    file: &FileChange,
    right_content: &str,
    selection: &S,
) -> Reconstructed {
    if !has_selection(file, selection) {
        return Reconstructed::Remove;
    }

    let right_lines: Vec<&str> = right_content.split('\n').collect();
    let mut kept = Vec::new();
    for (hunk_idx, hunk) in file.hunks.iter().enumerate() {
        for (line_idx, line) in hunk.lines.iter().enumerate() {
            if line.kind != LineKind::Addition {
                continue;
            }
            if !selection.is_line_selected(&file.path, hunk_idx, line_idx) {
                continue;
            }
            let content = line
                .new_line
                .and_then(|num| num.checked_sub(1))
                .and_then(|idx| right_lines.get(idx as usize));
            if let Some(content) = content {
                kept.push(*content);
            }
        }
    }
    Reconstructed::Content(kept.join("\n"))
}

/// A deleted file drops only the left lines whose deletion is selected.
/// No selection restores the left content; selecting every line removes
/// the file entirely.
fn reconstruct_deleted<S: SelectionView>(
    file: &FileChange,
    left_content: &str,
    selection: &S,
) -> Reconstructed {
    if !has_selection(file, selection) {
        return Reconstructed::Content(left_content.to_string());
    }

    let mut dropped = HashSet::new();
    for (hunk_idx, hunk) in file.hunks.iter().enumerate() {
        for (line_idx, line) in hunk.lines.iter().enumerate() {
            if line.kind == LineKind::Deletion
                && selection.is_line_selected(&file.path, hunk_idx, line_idx)
            {
                if let Some(num) = line.old_line {
                    dropped.insert(num);
                }
            }
        }
    }

    let kept: Vec<&str> = left_content
        .split('\n')
        .enumerate()
        .filter(|(idx, _)| !dropped.contains(&(*idx as u32 + 1)))
        .map(|(_, line)| line)
        .collect();

    let content = kept.join("\n");
    if content.is_empty() {
        return Reconstructed::Remove;
    }
    Reconstructed::Content(content)
}

/// Walk the left content, applying selected deletions (skip the line) and
/// splicing selected additions at their new-side positions. The position
/// counter advances only for emitted lines, so unselected changes shift
/// the rest of the file consistently.
fn reconstruct_modified<S: SelectionView>(
    file: &FileChange,
    left_content: &str,
    selection: &S,
) -> String {
    let mut deletions: HashSet<u32> = HashSet::new();
    let mut additions: BTreeMap<u32, Vec<String>> = BTreeMap::new();

    for (hunk_idx, hunk) in file.hunks.iter().enumerate() {
        for (line_idx, line) in hunk.lines.iter().enumerate() {
            if !selection.is_line_selected(&file.path, hunk_idx, line_idx) {
                continue;
            }
            match line.kind {
                LineKind::Deletion => {
                    if let Some(num) = line.old_line {
                        deletions.insert(num);
                    }
                }
                LineKind::Addition => {
                    if let Some(num) = line.new_line {
                        additions.entry(num).or_default().push(line.content.clone());
                    }
                }
                LineKind::Context => {}
            }
        }
    }

    let mut result: Vec<String> = Vec::new();
    let mut emitted = 0u32;
    for (idx, line) in left_content.split('\n').enumerate() {
        while let Some(added) = additions.remove(&(emitted + 1)) {
            emitted += added.len() as u32;
            result.extend(added);
        }
        if deletions.contains(&(idx as u32 + 1)) {
            continue;
        }
        result.push(line.to_string());
        emitted += 1;
    }
    // Additions positioned past the end of the walked content.
    for (_, added) in additions {
        result.extend(added);
    }

    result.join("\n")
}

fn has_selection<S: SelectionView>(file: &FileChange, selection: &S) -> bool {
    (0..file.hunks.len()).any(|hunk_idx| {
        selection.is_hunk_selected(&file.path, hunk_idx)
            || selection.has_partial_selection(&file.path, hunk_idx)
    })
}

/// Paths of files with no selection at all, sorted. Callers restore these
/// to their left state in one step instead of walking their hunks.
pub fn unselected_files<S: SelectionView>(files: &[FileChange], selection: &S) -> Vec<String> {
    let mut paths: Vec<String> = files
        .iter()
        .filter(|file| !has_selection(file, selection))
        .map(|file| file.path.clone())
        .collect();
    paths.sort();
    paths
}

/// Writes selection results into the right-side directory of a left/right
/// tree pair.
#[derive(Debug, Clone)]
pub struct Applier {
    left_dir: PathBuf,
    right_dir: PathBuf,
}

impl Applier {
    pub fn new(left_dir: impl Into<PathBuf>, right_dir: impl Into<PathBuf>) -> Self {
        Self {
            left_dir: left_dir.into(),
            right_dir: right_dir.into(),
        }
    }

    /// Rewrite every file in the right directory so it reflects only the
    /// selected changes.
    pub fn apply_selections<S: SelectionView>(
        &self,
        files: &[FileChange],
        selection: &S,
    ) -> Result<(), ApplyError> {
        for file in files {
            self.apply_file(file, selection)?;
        }
        Ok(())
    }

    fn apply_file<S: SelectionView>(
        &self,
        file: &FileChange,
        selection: &S,
    ) -> Result<(), ApplyError> {
        let left_path = self.left_dir.join(&file.path);
        let right_path = self.right_dir.join(&file.path);

        let left_content = match file.change_type {
            ChangeType::Added => String::new(),
            _ => read_file(&left_path)?,
        };
        let right_content = match file.change_type {
            ChangeType::Deleted => String::new(),
            ChangeType::Added if !has_selection(file, selection) => String::new(),
            _ => read_file(&right_path)?,
        };

        log::debug!(
            "applying selection to {} ({})",
            file.path,
            file.change_type
        );
        match reconstruct(file, &left_content, &right_content, selection) {
            Reconstructed::Content(content) => write_file(&right_path, &content),
            Reconstructed::Remove => remove_file(&right_path),
        }
    }
}

fn read_file(path: &Path) -> Result<String, ApplyError> {
    fs::read_to_string(path).map_err(|err| ApplyError::ReadFailed {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// Writes `content`, creating parent directories and restoring the
/// trailing newline that line joins drop.
fn write_file(path: &Path, content: &str) -> Result<(), ApplyError> {
    let failed = |err: std::io::Error| ApplyError::WriteFailed {
        path: path.display().to_string(),
        message: err.to_string(),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(failed)?;
    }

    let mut content = content.to_string();
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    fs::write(path, content).map_err(failed)
}

/// Removing a file that is already gone is fine; the right side may never
/// have materialized it.
fn remove_file(path: &Path) -> Result<(), ApplyError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(ApplyError::RemoveFailed {
            path: path.display().to_string(),
            message: err.to_string(),
        }),
    }
}
