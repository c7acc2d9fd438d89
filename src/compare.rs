//! Generates unified diff text from two in-memory file trees.
//!
//! The output is git-format diff text that [`crate::parse::parse_diff`]
//! accepts, so a left/right snapshot pair can be compared, presented, and
//! selectively applied without any external diff tool. Trees are plain
//! path-to-content maps; reading them off disk is [`crate::tree`]'s job.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

use similar::{ChangeTag, TextDiff};

use crate::model::{Line, LineKind};
use crate::patch::recalculate_header;

/// Context lines kept around each changed run in a modified-file hunk.
const CONTEXT_RADIUS: usize = 3;

/// Compare two trees and render the differences as unified diff text.
///
/// Paths are the union of both trees in lexicographic order, so output is
/// deterministic. Byte-identical files produce nothing; files present on
/// one side only become whole-file addition or deletion sections.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use jj_split::compare::compare_trees;
///
/// let left = BTreeMap::from([("f.txt".to_string(), "a\nb\n".to_string())]);
/// let right = BTreeMap::from([("f.txt".to_string(), "a\nc\n".to_string())]);
///
/// let diff = compare_trees(&left, &right);
/// assert!(diff.starts_with("diff --git a/f.txt b/f.txt\n"));
/// assert!(diff.contains("-b\n+c\n"));
/// ```
pub fn compare_trees(left: &BTreeMap<String, String>, right: &BTreeMap<String, String>) -> String {
    let paths: BTreeSet<&String> = left.keys().chain(right.keys()).collect();

    let mut diff = String::new();
    for path in paths {
        match (left.get(path), right.get(path)) {
            (None, Some(content)) => {
                let _ = write!(
                    diff,
                    "diff --git a/{path} b/{path}\nnew file mode 100644\n--- /dev/null\n+++ b/{path}\n"
                );
                diff.push_str(&whole_file_hunk(content, LineKind::Addition));
            }
            (Some(content), None) => {
                let _ = write!(
                    diff,
                    "diff --git a/{path} b/{path}\ndeleted file mode 100644\n--- a/{path}\n+++ /dev/null\n"
                );
                diff.push_str(&whole_file_hunk(content, LineKind::Deletion));
            }
            (Some(left_content), Some(right_content)) => {
                if left_content == right_content {
                    continue;
                }
                let _ = write!(
                    diff,
                    "diff --git a/{path} b/{path}\n--- a/{path}\n+++ b/{path}\n"
                );
                diff.push_str(&modified_file_hunks(left_content, right_content));
            }
            (None, None) => continue,
        }
    }
    diff
}

/// Single hunk covering every line of a purely added or deleted file.
/// Empty content yields no hunk at all, leaving just the file headers.
fn whole_file_hunk(content: &str, kind: LineKind) -> String {
    let lines = split_lines(content);
    if lines.is_empty() {
        return String::new();
    }

    let mut out = match kind {
        LineKind::Addition => format!("@@ -0,0 +1,{} @@\n", lines.len()),
        _ => format!("@@ -1,{} +0,0 @@\n", lines.len()),
    };
    for line in lines {
        out.push(kind.marker());
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn modified_file_hunks(left_content: &str, right_content: &str) -> String {
    let diff = TextDiff::from_lines(left_content, right_content);

    let mut rows: Vec<Line> = Vec::new();
    for change in diff.iter_all_changes() {
        let value = change.value();
        let content = value.strip_suffix('\n').unwrap_or(value).to_string();
        let (kind, old_line, new_line) = match change.tag() {
            ChangeTag::Equal => (
                LineKind::Context,
                change.old_index().map(|idx| idx as u32 + 1),
                change.new_index().map(|idx| idx as u32 + 1),
            ),
            ChangeTag::Delete => (
                LineKind::Deletion,
                change.old_index().map(|idx| idx as u32 + 1),
                None,
            ),
            ChangeTag::Insert => (
                LineKind::Addition,
                None,
                change.new_index().map(|idx| idx as u32 + 1),
            ),
        };
        rows.push(Line {
            kind,
            content,
            old_line,
            new_line,
        });
    }

    let mut out = String::new();
    for (start, end) in hunk_windows(&rows) {
        let window = &rows[start..=end];
        out.push_str(&recalculate_header(window));
        out.push('\n');
        for line in window {
            out.push(line.kind.marker());
            out.push_str(&line.content);
            out.push('\n');
        }
    }
    out
}

/// Group changed rows into inclusive index windows, widening each change by
/// [`CONTEXT_RADIUS`] and merging windows that touch or overlap.
fn hunk_windows(rows: &[Line]) -> Vec<(usize, usize)> {
    let change_indices: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, line)| line.kind != LineKind::Context)
        .map(|(idx, _)| idx)
        .collect();

    let last_row = rows.len().saturating_sub(1);
    let mut windows = Vec::new();
    let mut i = 0;
    while i < change_indices.len() {
        let start = change_indices[i].saturating_sub(CONTEXT_RADIUS);
        let mut end = (change_indices[i] + CONTEXT_RADIUS).min(last_row);

        while i + 1 < change_indices.len() {
            let next_start = change_indices[i + 1].saturating_sub(CONTEXT_RADIUS);
            if next_start <= end + 1 {
                end = (change_indices[i + 1] + CONTEXT_RADIUS).min(last_row);
                i += 1;
            } else {
                break;
            }
        }

        windows.push((start, end));
        i += 1;
    }
    windows
}

/// Split file content into lines, dropping the empty element a trailing
/// newline produces.
fn split_lines(content: &str) -> Vec<&str> {
    if content.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<&str> = content.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}
