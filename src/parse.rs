//! Permissive unified-diff parser.
//!
//! Accepts `git diff`-format text from any upstream (a version-control
//! subprocess or [`crate::compare`]) and produces [`FileChange`] values.
//! The parser never fails: sections without a recognizable `diff --git`
//! header are skipped, a hunk header that does not parse drops the hunk and
//! every content line up to the next header. Callers feed it partial or
//! diagnostic-polluted output and rely on getting the salvageable subset.

use crate::model::{ChangeType, FileChange, Hunk, Line, LineKind};
use log::debug;

/// Parse unified-diff text into per-file changes.
///
/// Empty input yields an empty list.
///
/// # Examples
/// ```
/// use jj_split::parse::parse_diff;
/// use jj_split::model::LineKind;
///
/// let text = "diff --git a/f.txt b/f.txt\n--- a/f.txt\n+++ b/f.txt\n@@ -1,2 +1,3 @@\n line1\n+line2\n line3\n";
/// let files = parse_diff(text);
/// assert_eq!(files.len(), 1);
/// assert_eq!(files[0].path, "f.txt");
/// assert_eq!(files[0].hunks[0].lines[1].kind, LineKind::Addition);
/// ```
pub fn parse_diff(diff_text: &str) -> Vec<FileChange> {
    if diff_text.is_empty() {
        return Vec::new();
    }

    let mut files = Vec::new();

    for section in diff_text.split("diff --git") {
        if section.trim().is_empty() {
            continue;
        }

        let section = format!("diff --git{section}");
        if let Some(file) = parse_section(&section) {
            files.push(file);
        }
    }

    debug!("parsed {} file change(s)", files.len());
    files
}

/// Parse one `diff --git ...` section. Returns `None` when the file header
/// is not recognizable.
fn parse_section(section: &str) -> Option<FileChange> {
    let mut lines = section.lines();

    let path = parse_file_header(lines.next()?)?;
    let change_type = classify_section(section);

    let mut hunks: Vec<Hunk> = Vec::new();
    let mut current: Option<Hunk> = None;
    let mut old_num = 0u32;
    let mut new_num = 0u32;

    for line in lines {
        if line.starts_with("@@") {
            if let Some(hunk) = current.take() {
                hunks.push(hunk);
            }

            // A malformed header leaves `current` empty, discarding content
            // lines until the next parsable header.
            current = parse_hunk_header(line);
            if let Some(hunk) = &current {
                old_num = hunk.old_start;
                new_num = hunk.new_start;
            }
            continue;
        }

        let Some(hunk) = current.as_mut() else {
            continue;
        };

        if line.starts_with("---")
            || line.starts_with("+++")
            || line.starts_with("index ")
            || line.starts_with("new file")
            || line.starts_with("deleted file")
        {
            continue;
        }

        if line.is_empty() {
            continue;
        }

        let parsed = match line.as_bytes()[0] {
            b'+' => Line {
                kind: LineKind::Addition,
                content: line[1..].to_string(),
                old_line: None,
                new_line: Some(new_num),
            },
            b'-' => Line {
                kind: LineKind::Deletion,
                content: line[1..].to_string(),
                old_line: Some(old_num),
                new_line: None,
            },
            b' ' => Line {
                kind: LineKind::Context,
                content: line[1..].to_string(),
                old_line: Some(old_num),
                new_line: Some(new_num),
            },
            // Unmarked lines (e.g. "\ No newline at end of file") are kept
            // verbatim as context, matching tolerant diff consumers.
            _ => Line {
                kind: LineKind::Context,
                content: line.to_string(),
                old_line: Some(old_num),
                new_line: Some(new_num),
            },
        };

        match parsed.kind {
            LineKind::Context => {
                old_num += 1;
                new_num += 1;
            }
            LineKind::Addition => new_num += 1,
            LineKind::Deletion => old_num += 1,
        }

        hunk.lines.push(parsed);
    }

    if let Some(hunk) = current.take() {
        hunks.push(hunk);
    }

    Some(FileChange {
        path,
        change_type,
        hunks,
    })
}

/// Extract the new-side path from `diff --git a/<path> b/<path>`.
///
/// The split is on the last ` b/` occurrence so paths containing ` b/` on
/// the a-side still resolve.
fn parse_file_header(line: &str) -> Option<String> {
    let rest = line.strip_prefix("diff --git a/")?;
    let idx = rest.rfind(" b/")?;
    let path = &rest[idx + 3..];
    if path.is_empty() {
        return None;
    }
    Some(path.to_string())
}

fn classify_section(section: &str) -> ChangeType {
    if section.contains("new file mode") {
        ChangeType::Added
    } else if section.contains("deleted file mode") {
        ChangeType::Deleted
    } else if section.contains("rename from") {
        ChangeType::Renamed
    } else {
        ChangeType::Modified
    }
}

/// Parse `@@ -oldStart[,oldLines] +newStart[,newLines] @@ ...` into an empty
/// hunk. Omitted counts default to 1 per the unified-diff grammar. Returns
/// `None` for anything malformed.
fn parse_hunk_header(header: &str) -> Option<Hunk> {
    let body = header.strip_prefix("@@ ")?;
    let end = body.find(" @@")?;

    let (old_part, new_part) = body[..end].split_once(' ')?;
    let (old_start, old_lines) = parse_range(old_part.strip_prefix('-')?)?;
    let (new_start, new_lines) = parse_range(new_part.strip_prefix('+')?)?;

    Some(Hunk {
        header: header.to_string(),
        old_start,
        old_lines,
        new_start,
        new_lines,
        lines: Vec::new(),
    })
}

/// Parse a range like `136,0` or `137` (count defaults to 1).
fn parse_range(range: &str) -> Option<(u32, u32)> {
    match range.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}
