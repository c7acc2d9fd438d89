//! Character-level highlighting for changed line pairs.
//!
//! A renderer showing a deletion/addition pair wants to emphasize only the
//! characters that actually differ. [`word_diff`] produces byte-offset
//! spans over each side of the pair, and [`line_pairs`] decides which
//! deletion and addition lines inside a hunk to treat as two versions of
//! the same line.

use std::collections::HashMap;

use similar::{ChangeTag, TextDiff};

use crate::model::{Hunk, LineKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Equal,
    Added,
    Deleted,
}

/// A run of characters within one line, as byte offsets into that line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntraLineSpan {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
    pub text: String,
}

/// Character-level spans for one deletion/addition line pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordDiff {
    pub old_spans: Vec<IntraLineSpan>,
    pub new_spans: Vec<IntraLineSpan>,
}

/// Diff two lines at character granularity.
///
/// Equal runs appear in both span lists, deleted runs only in `old_spans`
/// and added runs only in `new_spans`. Offsets are byte positions and
/// always fall on character boundaries. Spans on each side are contiguous
/// and cover the whole line.
///
/// # Examples
///
/// ```
/// use jj_split::wordlevel::{SpanKind, word_diff};
///
/// let diff = word_diff("foo=1", "foo=2");
/// assert_eq!(diff.old_spans[0].kind, SpanKind::Equal);
/// assert_eq!(diff.old_spans[0].text, "foo=");
/// assert_eq!(diff.old_spans[1].kind, SpanKind::Deleted);
/// assert_eq!(diff.new_spans[1].kind, SpanKind::Added);
/// assert_eq!(diff.new_spans[1].text, "2");
/// ```
pub fn word_diff(old_line: &str, new_line: &str) -> WordDiff {
    let diff = TextDiff::from_chars(old_line, new_line);

    // from_chars yields one change per character; fold consecutive changes
    // with the same tag back into runs before building spans.
    let mut runs: Vec<(ChangeTag, String)> = Vec::new();
    for change in diff.iter_all_changes() {
        match runs.last_mut() {
            Some((tag, text)) if *tag == change.tag() => text.push_str(change.value()),
            _ => runs.push((change.tag(), change.value().to_string())),
        }
    }

    let mut result = WordDiff::default();
    let mut old_pos = 0;
    let mut new_pos = 0;
    for (tag, text) in runs {
        let len = text.len();
        match tag {
            ChangeTag::Equal => {
                result.old_spans.push(IntraLineSpan {
                    start: old_pos,
                    end: old_pos + len,
                    kind: SpanKind::Equal,
                    text: text.clone(),
                });
                result.new_spans.push(IntraLineSpan {
                    start: new_pos,
                    end: new_pos + len,
                    kind: SpanKind::Equal,
                    text,
                });
                old_pos += len;
                new_pos += len;
            }
            ChangeTag::Delete => {
                result.old_spans.push(IntraLineSpan {
                    start: old_pos,
                    end: old_pos + len,
                    kind: SpanKind::Deleted,
                    text,
                });
                old_pos += len;
            }
            ChangeTag::Insert => {
                result.new_spans.push(IntraLineSpan {
                    start: new_pos,
                    end: new_pos + len,
                    kind: SpanKind::Added,
                    text,
                });
                new_pos += len;
            }
        }
    }
    result
}

/// A deletion line and the addition line treated as its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePair {
    pub old_line_idx: usize,
    pub new_line_idx: usize,
}

/// Pair deletion and addition lines within a hunk by position.
///
/// Each maximal run of consecutive deletions is matched against the run of
/// additions immediately following it, first with first, second with
/// second, up to the shorter run's length. Excess lines in the longer run
/// stay unpaired. Content similarity plays no part.
pub fn line_pairs(hunk: &Hunk) -> Vec<LinePair> {
    let lines = &hunk.lines;
    let mut pairs = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].kind != LineKind::Deletion {
            i += 1;
            continue;
        }

        let del_start = i;
        while i < lines.len() && lines[i].kind == LineKind::Deletion {
            i += 1;
        }
        let del_count = i - del_start;

        let add_start = i;
        while i < lines.len() && lines[i].kind == LineKind::Addition {
            i += 1;
        }
        let add_count = i - add_start;

        for j in 0..del_count.min(add_count) {
            pairs.push(LinePair {
                old_line_idx: del_start + j,
                new_line_idx: add_start + j,
            });
        }
    }

    pairs
}

/// Word diffs for every paired line in a hunk, keyed by line index. Both
/// indices of a pair map to the same result, so a renderer can look up
/// either side directly.
pub fn hunk_word_diffs(hunk: &Hunk) -> HashMap<usize, WordDiff> {
    let mut results = HashMap::new();
    for pair in line_pairs(hunk) {
        let diff = word_diff(
            &hunk.lines[pair.old_line_idx].content,
            &hunk.lines[pair.new_line_idx].content,
        );
        results.insert(pair.old_line_idx, diff.clone());
        results.insert(pair.new_line_idx, diff);
    }
    results
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::parse::parse_diff;
    use similar_asserts::assert_eq;

    #[test]
    fn common_prefix_stays_equal() {
        let diff = word_diff("foo=1", "foo=2");

        assert_eq!(diff.old_spans.len(), 2);
        assert_eq!(diff.old_spans[0].kind, SpanKind::Equal);
        assert_eq!(diff.old_spans[0].text, "foo=");
        assert_eq!((diff.old_spans[0].start, diff.old_spans[0].end), (0, 4));
        assert_eq!(diff.old_spans[1].kind, SpanKind::Deleted);
        assert_eq!((diff.old_spans[1].start, diff.old_spans[1].end), (4, 5));

        assert_eq!(diff.new_spans.len(), 2);
        assert_eq!(diff.new_spans[1].kind, SpanKind::Added);
        assert_eq!(diff.new_spans[1].text, "2");
    }

    #[test]
    fn identical_lines_yield_single_equal_span() {
        let diff = word_diff("same", "same");

        assert_eq!(diff.old_spans.len(), 1);
        assert_eq!(diff.new_spans.len(), 1);
        assert_eq!(diff.old_spans[0].kind, SpanKind::Equal);
        assert_eq!((diff.old_spans[0].start, diff.old_spans[0].end), (0, 4));
    }

    #[test]
    fn pure_insertion_leaves_old_side_untouched() {
        let diff = word_diff("bar", "foobar");

        assert_eq!(diff.old_spans.len(), 1);
        assert_eq!(diff.old_spans[0].kind, SpanKind::Equal);
        assert_eq!(diff.old_spans[0].text, "bar");

        let added: Vec<&IntraLineSpan> = diff
            .new_spans
            .iter()
            .filter(|span| span.kind == SpanKind::Added)
            .collect();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].text, "foo");
    }

    #[test]
    fn spans_cover_each_side_contiguously() {
        let diff = word_diff("let x = compute(a);", "let y = compute(a, b);");

        let mut pos = 0;
        for span in &diff.old_spans {
            assert_eq!(span.start, pos);
            pos = span.end;
        }
        assert_eq!(pos, "let x = compute(a);".len());

        pos = 0;
        for span in &diff.new_spans {
            assert_eq!(span.start, pos);
            pos = span.end;
        }
        assert_eq!(pos, "let y = compute(a, b);".len());
    }

    #[test]
    fn multibyte_offsets_stay_on_char_boundaries() {
        let old = "prix: 1€";
        let new = "prix: 2€";
        let diff = word_diff(old, new);

        for span in &diff.old_spans {
            assert!(old.is_char_boundary(span.start) && old.is_char_boundary(span.end));
        }
        for span in &diff.new_spans {
            assert!(new.is_char_boundary(span.start) && new.is_char_boundary(span.end));
        }
        let deleted = diff
            .old_spans
            .iter()
            .find(|span| span.kind == SpanKind::Deleted)
            .unwrap();
        assert_eq!(deleted.text, "1");
    }

    fn hunk_from(body: &str) -> Hunk {
        let diff = format!(
            "diff --git a/f.txt b/f.txt\n--- a/f.txt\n+++ b/f.txt\n{body}"
        );
        parse_diff(&diff).remove(0).hunks.remove(0)
    }

    #[test]
    fn pairs_balanced_runs_positionally() {
        let hunk = hunk_from("@@ -1,4 +1,4 @@\n a\n-x\n-y\n+X\n+Y\n b\n");
        let pairs = line_pairs(&hunk);

        assert_eq!(
            pairs,
            vec![
                LinePair { old_line_idx: 1, new_line_idx: 3 },
                LinePair { old_line_idx: 2, new_line_idx: 4 },
            ]
        );
    }

    #[test]
    fn excess_deletions_stay_unpaired() {
        let hunk = hunk_from("@@ -1,4 +1,2 @@\n-x\n-y\n-z\n+X\n c\n");
        let pairs = line_pairs(&hunk);

        assert_eq!(pairs, vec![LinePair { old_line_idx: 0, new_line_idx: 3 }]);
    }

    #[test]
    fn deletion_run_without_following_additions_is_unpaired() {
        let hunk = hunk_from("@@ -1,3 +1,3 @@\n-x\n a\n+X\n b\n");
        let pairs = line_pairs(&hunk);

        // Context separates the runs, so nothing pairs.
        assert!(pairs.is_empty());
    }

    #[test]
    fn hunk_word_diffs_keyed_by_both_sides() {
        let hunk = hunk_from("@@ -1,1 +1,1 @@\n-foo=1\n+foo=2\n");
        let diffs = hunk_word_diffs(&hunk);

        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs.get(&0), diffs.get(&1));
        let diff = diffs.get(&0).unwrap();
        assert_eq!(diff.old_spans[1].text, "1");
        assert_eq!(diff.new_spans[1].text, "2");
    }
}
