//! Tests for FileSystemBuilder

use std::path::{Path, MAIN_SEPARATOR};

use tempfile::TempDir;

use treetile::domain::{DomainError, FileSystemBuilder, NodeSource, TreeArena};

fn create_file(dir: &TempDir, name: &str, size: usize) {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(&path, vec![b'x'; size]).expect("write file");
}

/// root
/// ├── .hidden   4
/// ├── a.txt     5
/// ├── empty/
/// └── sub/
///     ├── b.txt 10
///     └── c.txt 3
fn sample_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    create_file(&temp, ".hidden", 4);
    create_file(&temp, "a.txt", 5);
    create_file(&temp, "sub/b.txt", 10);
    create_file(&temp, "sub/c.txt", 3);
    std::fs::create_dir(temp.path().join("empty")).unwrap();
    temp
}

fn child_names(tree: &TreeArena, idx: generational_arena::Index) -> Vec<&str> {
    tree.children(idx)
        .iter()
        .filter_map(|&c| tree.name(c))
        .collect()
}

fn dir_name(dir: &TempDir) -> String {
    dir.path()
        .canonicalize()
        .unwrap()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .into_owned()
}

#[test]
fn given_directory_when_building_then_files_weighted_by_size() {
    // Arrange
    let temp = sample_dir();

    // Act
    let tree = FileSystemBuilder::new()
        .seed(Some(1))
        .build_from_path(temp.path())
        .unwrap();

    // Assert
    let root = tree.root().unwrap();
    assert_eq!(tree.name(root), Some(dir_name(&temp).as_str()));
    assert_eq!(tree.weight(root), Some(22));
    assert_eq!(child_names(&tree, root), vec![".hidden", "a.txt", "empty", "sub"]);
    assert!(tree.check_invariants().is_ok());
}

#[test]
fn given_empty_subdirectory_when_building_then_weightless_leaf() {
    let temp = sample_dir();

    let tree = FileSystemBuilder::new().build_from_path(temp.path()).unwrap();

    let (empty, node) = tree
        .iter()
        .find(|(_, n)| n.data.name.as_deref() == Some("empty"))
        .unwrap();
    assert!(node.is_leaf());
    assert_eq!(tree.weight(empty), Some(0));
    assert_eq!(
        tree.path_string(empty, false),
        Some(format!("{}{}empty (file)", dir_name(&temp), MAIN_SEPARATOR))
    );
}

#[test]
fn given_skip_hidden_when_building_then_dot_entries_left_out() {
    let temp = sample_dir();

    let tree = FileSystemBuilder::new()
        .skip_hidden(true)
        .build_from_path(temp.path())
        .unwrap();

    let root = tree.root().unwrap();
    assert_eq!(tree.weight(root), Some(18));
    assert_eq!(child_names(&tree, root), vec!["a.txt", "empty", "sub"]);
}

#[test]
fn given_nested_file_when_rendering_path_then_joined_with_separator() {
    let temp = sample_dir();
    let tree = FileSystemBuilder::new().build_from_path(temp.path()).unwrap();

    let (b, _) = tree
        .iter()
        .find(|(_, n)| n.data.name.as_deref() == Some("b.txt"))
        .unwrap();
    let sep = MAIN_SEPARATOR;
    assert_eq!(
        tree.path_string(b, false),
        Some(format!("{}{sep}sub{sep}b.txt (file)", dir_name(&temp)))
    );

    let sub = tree.parent(b).unwrap();
    assert_eq!(tree.weight(sub), Some(13));
    assert_eq!(
        tree.path_string(sub, true),
        Some(format!("{}{sep}sub (folder)", dir_name(&temp)))
    );
}

#[test]
fn given_file_nodes_when_building_then_source_paths_recorded() {
    let temp = sample_dir();
    let tree = FileSystemBuilder::new().build_from_path(temp.path()).unwrap();

    let (_, a) = tree
        .iter()
        .find(|(_, n)| n.data.name.as_deref() == Some("a.txt"))
        .unwrap();
    match &a.data.source {
        Some(NodeSource::File { path }) => assert!(path.ends_with("a.txt")),
        other => panic!("unexpected source: {:?}", other),
    }
}

#[test]
fn given_single_file_when_building_then_root_is_leaf() {
    let temp = TempDir::new().unwrap();
    create_file(&temp, "only.bin", 42);

    let tree = FileSystemBuilder::new()
        .build_from_path(&temp.path().join("only.bin"))
        .unwrap();

    let root = tree.root().unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.name(root), Some("only.bin"));
    assert_eq!(tree.weight(root), Some(42));
    assert_eq!(tree.path_string(root, false).as_deref(), Some("only.bin"));
}

#[test]
fn given_nonexistent_path_when_building_then_path_not_found() {
    let result = FileSystemBuilder::new().build_from_path(Path::new("/nonexistent/treetile"));

    assert!(matches!(result, Err(DomainError::PathNotFound(_))));
}
