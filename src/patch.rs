//! Turns a selection over parsed changes back into unified diff text.
//!
//! The output is what the rest of the pipeline consumes: a fully selected
//! hunk round-trips through [`crate::parse::parse_diff`] unchanged apart
//! from the recalculated `@@` header, and a partial selection yields a
//! self-consistent patch containing only the chosen lines plus surrounding
//! context.

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::model::{ChangeType, FileChange, Hunk, Line, LineKind};
use crate::selection::SelectionView;

/// Context lines kept on each side of a selected line in a partial hunk.
const CONTEXT_RADIUS: usize = 3;

/// Render the selected portion of `files` as unified diff text.
///
/// Files without any selection are omitted. A whole-selected hunk is
/// emitted verbatim, original header included; a partially selected hunk
/// keeps the selected lines, widens them by [`CONTEXT_RADIUS`], demotes
/// unselected deletions to context, drops unselected additions, and gets
/// a header recalculated from the emitted lines.
///
/// # Examples
///
/// ```
/// use jj_split::parse::parse_diff;
/// use jj_split::patch::generate_patch;
/// use jj_split::selection::SelectionSet;
///
/// let diff = "diff --git a/f.txt b/f.txt\n\
///             --- a/f.txt\n\
///             +++ b/f.txt\n\
///             @@ -1,2 +1,3 @@\n line1\n+line2\n line3\n";
/// let files = parse_diff(diff);
///
/// let mut selection = SelectionSet::new();
/// selection.toggle_hunk("f.txt", 0);
///
/// let patch = generate_patch(&files, &selection);
/// assert!(patch.contains("@@ -1,2 +1,3 @@"));
/// assert!(patch.contains("+line2"));
/// ```
pub fn generate_patch<S: SelectionView>(files: &[FileChange], selection: &S) -> String {
    let mut patch = String::new();

    for file in files {
        let mut hunks = Vec::new();
        for (hunk_idx, hunk) in file.hunks.iter().enumerate() {
            if selection.is_hunk_selected(&file.path, hunk_idx) {
                hunks.push(render_hunk(&hunk.header, &hunk.lines));
            } else if selection.has_partial_selection(&file.path, hunk_idx) {
                let lines = partial_lines(hunk, |line_idx| {
                    selection.is_line_selected(&file.path, hunk_idx, line_idx)
                });
                if !lines.is_empty() {
                    hunks.push(render_hunk(&recalculate_header(&lines), &lines));
                }
            }
        }
        if hunks.is_empty() {
            continue;
        }

        let path = &file.path;
        let _ = write!(patch, "diff --git a/{path} b/{path}\n");
        match file.change_type {
            ChangeType::Added => {
                let _ = write!(patch, "new file mode 100644\n--- /dev/null\n+++ b/{path}\n");
            }
            ChangeType::Deleted => {
                let _ = write!(patch, "deleted file mode 100644\n--- a/{path}\n+++ /dev/null\n");
            }
            _ => {
                let _ = write!(patch, "--- a/{path}\n+++ b/{path}\n");
            }
        }
        for hunk in hunks {
            patch.push_str(&hunk);
        }
    }

    patch
}

/// Reduce a hunk to the lines a partial selection keeps.
///
/// Selected indices are widened by [`CONTEXT_RADIUS`] on both sides,
/// clamped to the hunk. Within that window, unselected additions vanish
/// (they never existed on the left side) and unselected deletions turn
/// into context (the left line stays).
fn partial_lines(hunk: &Hunk, is_selected: impl Fn(usize) -> bool) -> Vec<Line> {
    let mut included = BTreeSet::new();
    for (line_idx, _) in hunk.lines.iter().enumerate() {
        if is_selected(line_idx) {
            let start = line_idx.saturating_sub(CONTEXT_RADIUS);
            let end = (line_idx + CONTEXT_RADIUS).min(hunk.lines.len().saturating_sub(1));
            included.extend(start..=end);
        }
    }

    let mut lines = Vec::new();
    for line_idx in included {
        let line = &hunk.lines[line_idx];
        match line.kind {
            LineKind::Context => lines.push(line.clone()),
            LineKind::Addition if is_selected(line_idx) => lines.push(line.clone()),
            LineKind::Addition => {}
            LineKind::Deletion if is_selected(line_idx) => lines.push(line.clone()),
            LineKind::Deletion => lines.push(Line {
                kind: LineKind::Context,
                content: line.content.clone(),
                old_line: line.old_line,
                new_line: None,
            }),
        }
    }
    lines
}

fn render_hunk(header: &str, lines: &[Line]) -> String {
    let mut out = header.to_string();
    out.push('\n');
    for line in lines {
        out.push(line.kind.marker());
        out.push_str(&line.content);
        out.push('\n');
    }
    out
}

/// Build an explicit-count `@@` header describing `lines`.
///
/// Starts come from the first line carrying a number on that side,
/// falling back to 1; counts follow the unified diff rule (old counts
/// context and deletions, new counts context and additions). An empty
/// slice yields `@@ -0,0 +0,0 @@`.
pub(crate) fn recalculate_header(lines: &[Line]) -> String {
    if lines.is_empty() {
        return "@@ -0,0 +0,0 @@".to_string();
    }

    let old_start = lines.iter().find_map(|line| line.old_line).unwrap_or(1);
    let new_start = lines.iter().find_map(|line| line.new_line).unwrap_or(1);
    let old_count = lines
        .iter()
        .filter(|line| line.kind != LineKind::Addition)
        .count();
    let new_count = lines
        .iter()
        .filter(|line| line.kind != LineKind::Deletion)
        .count();

    format!("@@ -{old_start},{old_count} +{new_start},{new_count} @@")
}
