//! Caller-owned selection state and the read-only view the engine queries.
//!
//! The engine never mutates selection; it only asks the three questions in
//! [`SelectionView`]. [`SelectionSet`] is the canonical implementation a UI
//! holds and mutates: per `(path, hunk index)` a hunk is unselected, selected
//! as a whole, or carries an explicit set of selected line indices. Making
//! [`Selection`] a tagged enum keeps the "whole-hunk selection discards any
//! partial line set" rule a construction invariant instead of a side effect.

use std::collections::{BTreeMap, BTreeSet};

/// Read-only selection queries the engine depends on.
pub trait SelectionView {
    fn is_hunk_selected(&self, path: &str, hunk_idx: usize) -> bool;

    /// True when the hunk carries a non-empty line-level selection (and is
    /// not whole-hunk selected).
    fn has_partial_selection(&self, path: &str, hunk_idx: usize) -> bool;

    /// True for every line index when the whole hunk is selected.
    fn is_line_selected(&self, path: &str, hunk_idx: usize, line_idx: usize) -> bool;
}

/// Selection state of a single hunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Whole,
    /// Indices into the hunk's line list. Never empty: an emptied set
    /// collapses back to [`Selection::None`].
    Partial(BTreeSet<usize>),
}

/// Selection state across all files of one loaded diff, keyed by
/// `(path, hunk index)`.
///
/// Hunk indices refer to positions in the [`crate::model::FileChange`] the
/// diff was parsed into; after a reload the caller decides whether to re-key
/// or drop the state.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    hunks: BTreeMap<(String, usize), Selection>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self, path: &str, hunk_idx: usize) -> &Selection {
        self.hunks
            .get(&(path.to_string(), hunk_idx))
            .unwrap_or(&Selection::None)
    }

    /// Toggle whole-hunk selection. Turning it on discards any line-level
    /// selection for that hunk.
    pub fn toggle_hunk(&mut self, path: &str, hunk_idx: usize) {
        let key = (path.to_string(), hunk_idx);
        let next = match self.hunks.get(&key) {
            Some(Selection::Whole) => Selection::None,
            _ => Selection::Whole,
        };
        self.set(key, next);
    }

    /// Toggle one line. No-op while the whole hunk is selected.
    pub fn toggle_line(&mut self, path: &str, hunk_idx: usize, line_idx: usize) {
        let key = (path.to_string(), hunk_idx);
        let next = match self.hunks.get(&key) {
            Some(Selection::Whole) => return,
            Some(Selection::Partial(lines)) => {
                let mut lines = lines.clone();
                if !lines.remove(&line_idx) {
                    lines.insert(line_idx);
                }
                if lines.is_empty() {
                    Selection::None
                } else {
                    Selection::Partial(lines)
                }
            }
            _ => Selection::Partial(BTreeSet::from([line_idx])),
        };
        self.set(key, next);
    }

    /// Select an inclusive range of lines, keeping any lines already
    /// selected. Clears whole-hunk selection first.
    pub fn select_line_range(&mut self, path: &str, hunk_idx: usize, start: usize, end: usize) {
        let key = (path.to_string(), hunk_idx);
        let mut lines = match self.hunks.get(&key) {
            Some(Selection::Partial(lines)) => lines.clone(),
            _ => BTreeSet::new(),
        };
        lines.extend(start..=end);

        if lines.is_empty() {
            return;
        }
        self.set(key, Selection::Partial(lines));
    }

    /// Select every hunk of every file whole.
    pub fn select_all(&mut self, files: &[crate::model::FileChange]) {
        for file in files {
            for hunk_idx in 0..file.hunks.len() {
                self.set((file.path.clone(), hunk_idx), Selection::Whole);
            }
        }
    }

    pub fn clear(&mut self) {
        self.hunks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// True when any hunk of `path` has a whole or partial selection.
    pub fn has_file_selection(&self, path: &str) -> bool {
        self.hunks
            .iter()
            .any(|((p, _), sel)| p == path && *sel != Selection::None)
    }

    fn set(&mut self, key: (String, usize), selection: Selection) {
        if selection == Selection::None {
            self.hunks.remove(&key);
        } else {
            self.hunks.insert(key, selection);
        }
    }
}

impl SelectionView for SelectionSet {
    fn is_hunk_selected(&self, path: &str, hunk_idx: usize) -> bool {
        matches!(self.selection(path, hunk_idx), Selection::Whole)
    }

    fn has_partial_selection(&self, path: &str, hunk_idx: usize) -> bool {
        matches!(self.selection(path, hunk_idx), Selection::Partial(_))
    }

    fn is_line_selected(&self, path: &str, hunk_idx: usize, line_idx: usize) -> bool {
        match self.selection(path, hunk_idx) {
            Selection::None => false,
            Selection::Whole => true,
            Selection::Partial(lines) => lines.contains(&line_idx),
        }
    }
}
