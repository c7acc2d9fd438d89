use std::fs;
use std::path::Path;
use tempfile::TempDir;

use jj_split::selection::SelectionSet;
use jj_split::{ChangeType, DiffEditor};

/// Test fixture holding a left/right directory pair, the shape a
/// diff-editor invocation provides
struct Fixture {
    left: TempDir,
    right: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            left: TempDir::new().expect("Failed to create left dir"),
            right: TempDir::new().expect("Failed to create right dir"),
        }
    }

    fn editor(&self) -> DiffEditor {
        DiffEditor::new(self.left.path(), self.right.path())
    }

    fn write(&self, side: &Path, name: &str, content: &str) {
        let path = side.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn write_left(&self, name: &str, content: &str) {
        self.write(self.left.path(), name, content);
    }

    fn write_right(&self, name: &str, content: &str) {
        self.write(self.right.path(), name, content);
    }

    fn read_right(&self, name: &str) -> String {
        fs::read_to_string(self.right.path().join(name)).unwrap()
    }

    fn right_exists(&self, name: &str) -> bool {
        self.right.path().join(name).exists()
    }

    /// A pair with one unchanged, one modified, one deleted, and one added
    /// file
    fn standard() -> Self {
        let fixture = Self::new();
        fixture.write_left("keep.txt", "same\ncontent\n");
        fixture.write_right("keep.txt", "same\ncontent\n");
        fixture.write_left("mod.txt", "alpha\nbeta\ngamma\n");
        fixture.write_right("mod.txt", "alpha\nBETA\ngamma\n");
        fixture.write_left("gone.txt", "doomed\n");
        fixture.write_right("new.txt", "fresh\nfile\n");
        fixture
    }
}

#[test]
fn load_reports_each_change_type() {
    let fixture = Fixture::standard();
    let files = fixture.editor().load().unwrap();

    let types: Vec<(&str, ChangeType)> = files
        .iter()
        .map(|file| (file.path.as_str(), file.change_type))
        .collect();
    assert_eq!(
        types,
        vec![
            ("gone.txt", ChangeType::Deleted),
            ("mod.txt", ChangeType::Modified),
            ("new.txt", ChangeType::Added),
        ]
    );
}

#[test]
fn unchanged_files_never_appear() {
    let fixture = Fixture::standard();
    let files = fixture.editor().load().unwrap();
    assert!(files.iter().all(|file| file.path != "keep.txt"));
}

#[test]
fn select_nothing_restores_right_to_left() {
    let fixture = Fixture::standard();
    let editor = fixture.editor();
    let files = editor.load().unwrap();

    editor.apply(&files, &SelectionSet::new()).unwrap();

    assert_eq!(fixture.read_right("mod.txt"), "alpha\nbeta\ngamma\n");
    assert_eq!(fixture.read_right("gone.txt"), "doomed\n");
    assert!(!fixture.right_exists("new.txt"));
    assert_eq!(fixture.read_right("keep.txt"), "same\ncontent\n");
}

#[test]
fn select_everything_keeps_right_as_is() {
    let fixture = Fixture::standard();
    let editor = fixture.editor();
    let files = editor.load().unwrap();

    let mut selection = SelectionSet::new();
    selection.select_all(&files);
    editor.apply(&files, &selection).unwrap();

    assert_eq!(fixture.read_right("mod.txt"), "alpha\nBETA\ngamma\n");
    assert!(!fixture.right_exists("gone.txt"));
    assert_eq!(fixture.read_right("new.txt"), "fresh\nfile\n");
}

#[test]
fn select_single_file_keeps_only_that_change() {
    let fixture = Fixture::standard();
    let editor = fixture.editor();
    let files = editor.load().unwrap();

    let mut selection = SelectionSet::new();
    selection.toggle_hunk("mod.txt", 0);
    editor.apply(&files, &selection).unwrap();

    assert_eq!(fixture.read_right("mod.txt"), "alpha\nBETA\ngamma\n");
    // Everything else reverts.
    assert_eq!(fixture.read_right("gone.txt"), "doomed\n");
    assert!(!fixture.right_exists("new.txt"));
}

#[test]
fn partial_line_selection_splits_a_change() {
    let fixture = Fixture::new();
    fixture.write_left("f.txt", "one\ntwo\nthree\n");
    fixture.write_right("f.txt", "ONE\ntwo\nTHREE\n");

    let editor = fixture.editor();
    let files = editor.load().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].hunks.len(), 1);

    // Keep only the first replacement, revert the second.
    let hunk = &files[0].hunks[0];
    let mut selection = SelectionSet::new();
    for (line_idx, line) in hunk.lines.iter().enumerate() {
        let touches_first = line.old_line == Some(1) || line.new_line == Some(1);
        if touches_first && line.kind != jj_split::LineKind::Context {
            selection.toggle_line("f.txt", 0, line_idx);
        }
    }

    editor.apply(&files, &selection).unwrap();
    assert_eq!(fixture.read_right("f.txt"), "ONE\ntwo\nthree\n");
}

#[test]
fn generated_patch_round_trips_through_parse() {
    let fixture = Fixture::standard();
    let editor = fixture.editor();
    let files = editor.load().unwrap();

    let mut selection = SelectionSet::new();
    selection.select_all(&files);
    let patch = jj_split::generate_patch(&files, &selection);
    let reparsed = jj_split::parse_diff(&patch);

    assert_eq!(reparsed.len(), files.len());
    for (original, round) in files.iter().zip(&reparsed) {
        assert_eq!(original.path, round.path);
        assert_eq!(original.change_type, round.change_type);
        assert_eq!(original.hunks.len(), round.hunks.len());
        for (a, b) in original.hunks.iter().zip(&round.hunks) {
            assert_eq!(a.header, b.header);
            assert_eq!(a.lines.len(), b.lines.len());
        }
    }
}

#[test]
fn summary_counts_added_and_deleted_lines() {
    let fixture = Fixture::standard();
    let summary = fixture.editor().summary().unwrap();

    assert!(summary.contains("D gone.txt +0 -1"));
    assert!(summary.contains("M mod.txt +1 -1"));
    assert!(summary.contains("A new.txt +2 -0"));
}

#[test]
fn nested_paths_survive_apply() {
    let fixture = Fixture::new();
    fixture.write_left("src/deep/f.txt", "old\n");
    fixture.write_right("src/deep/f.txt", "new\n");

    let editor = fixture.editor();
    let files = editor.load().unwrap();
    assert_eq!(files[0].path, "src/deep/f.txt");

    editor.apply(&files, &SelectionSet::new()).unwrap();
    assert_eq!(fixture.read_right("src/deep/f.txt"), "old\n");
}
