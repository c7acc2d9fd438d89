//! Parsed-diff data model shared by every engine component.
//!
//! A [`FileChange`] is an immutable snapshot of one file's changes, built by
//! the parser or the directory comparator and discarded on the next reload.
//! Selection state lives elsewhere (see [`crate::selection`]); nothing here
//! is mutated after construction.

use std::fmt;

/// How a file changed between the left and right side of a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Modified,
    Added,
    Deleted,
    Renamed,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            ChangeType::Modified => "M",
            ChangeType::Added => "A",
            ChangeType::Deleted => "D",
            ChangeType::Renamed => "R",
        };
        f.write_str(letter)
    }
}

/// Classification of a single diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Context,
    Addition,
    Deletion,
}

impl LineKind {
    /// The unified-diff marker this kind renders with.
    pub fn marker(self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Addition => '+',
            LineKind::Deletion => '-',
        }
    }
}

/// One line of diff content, without its marker or trailing newline.
///
/// Context lines carry both 1-based line numbers; additions carry only the
/// new-side number and deletions only the old-side number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub content: String,
    pub old_line: Option<u32>,
    pub new_line: Option<u32>,
}

/// One contiguous region of change within a file.
///
/// Invariant: `old_lines` equals the count of Context plus Deletion lines,
/// `new_lines` the count of Context plus Addition lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// The header line as it appeared in the source diff, trailing section
    /// heading included.
    pub header: String,
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    pub lines: Vec<Line>,
}

/// All changes to a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub change_type: ChangeType,
    pub hunks: Vec<Hunk>,
}

impl FileChange {
    /// Total diff lines across all hunks, context included.
    pub fn total_lines(&self) -> usize {
        self.hunks.iter().map(|h| h.lines.len()).sum()
    }

    pub fn added_lines(&self) -> usize {
        self.count_kind(LineKind::Addition)
    }

    pub fn deleted_lines(&self) -> usize {
        self.count_kind(LineKind::Deletion)
    }

    fn count_kind(&self, kind: LineKind) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| h.lines.iter())
            .filter(|l| l.kind == kind)
            .count()
    }
}

/// Format a one-line-per-file summary of a parsed diff.
///
/// Example output:
/// ```text
/// M src/main.rs +3 -1
/// A docs/notes.md +12 -0
/// ```
pub fn change_summary(files: &[FileChange]) -> String {
    let mut result = String::new();

    for file in files {
        result.push_str(&format!(
            "{} {} +{} -{}\n",
            file.change_type,
            file.path,
            file.added_lines(),
            file.deleted_lines()
        ));
    }

    result
}
