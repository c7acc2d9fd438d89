use error_set::error_set;
use std::path::{Path, PathBuf};

pub mod apply;
pub mod compare;
pub mod model;
pub mod parse;
pub mod patch;
pub mod selection;
pub mod source;
pub mod tree;
pub mod wordlevel;

pub use apply::{ApplyError, Applier, Reconstructed};
pub use model::{ChangeType, FileChange, Hunk, Line, LineKind};
pub use parse::parse_diff;
pub use patch::generate_patch;
pub use selection::{Selection, SelectionSet, SelectionView};
pub use source::{DiffSource, DirectorySource};
pub use tree::TreeError;

error_set! {
    /// Top-level error for diff-editor operations
    SplitError := {
        TreeError(TreeError),
        ApplyError(ApplyError),
    }
}

/// Main interface for editing the diff between two directory snapshots.
///
/// A diff-editor invocation hands us a left (before) and right (after)
/// directory; the session computes the diff between them and can rewrite
/// the right side to keep only a selection of the changes.
pub struct DiffEditor {
    left_dir: PathBuf,
    right_dir: PathBuf,
}

impl DiffEditor {
    /// Create a session over a left/right directory pair
    pub fn new(left_dir: impl Into<PathBuf>, right_dir: impl Into<PathBuf>) -> Self {
        Self {
            left_dir: left_dir.into(),
            right_dir: right_dir.into(),
        }
    }

    pub fn left_dir(&self) -> &Path {
        &self.left_dir
    }

    pub fn right_dir(&self) -> &Path {
        &self.right_dir
    }

    /// Compare the two directories and parse the result into per-file
    /// changes.
    ///
    /// # Examples
    /// ```no_run
    /// # use jj_split::DiffEditor;
    /// let editor = DiffEditor::new("/tmp/left", "/tmp/right");
    /// let files = editor.load().unwrap();
    /// for file in &files {
    ///     println!("{} {}", file.change_type, file.path);
    /// }
    /// ```
    pub fn load(&self) -> Result<Vec<FileChange>, SplitError> {
        let source = DirectorySource::new(&self.left_dir, &self.right_dir);
        log::debug!("loading diff for {}", source.label());
        Ok(parse_diff(&source.diff()?))
    }

    /// One line per changed file with added/deleted line counts
    pub fn summary(&self) -> Result<String, SplitError> {
        Ok(model::change_summary(&self.load()?))
    }

    /// Rewrite the right directory so it contains only the selected
    /// changes. Files with no selection revert to their left state.
    pub fn apply<S: SelectionView>(
        &self,
        files: &[FileChange],
        selection: &S,
    ) -> Result<(), SplitError> {
        let applier = Applier::new(&self.left_dir, &self.right_dir);
        Ok(applier.apply_selections(files, selection)?)
    }
}
