//! Integration tests for repository discovery and filtering

mod common;

use common::{create_multiple_repos, is_git_available, FakeRepoTree};
use gitstatus::core::{filter_repos, scan_repos, FilterSpec};
use std::path::PathBuf;

fn sorted_paths(tree: &FakeRepoTree, max_depth: usize) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = scan_repos(tree.path(), max_depth)
        .into_iter()
        .map(|repo| repo.path)
        .collect();
    paths.sort();
    paths
}

#[test]
fn test_depth_bound_is_inclusive() {
    let tree = FakeRepoTree::new().expect("Failed to create temp directory");
    let shallow = tree.repo("alpha", 10).unwrap();
    let nested = tree.repo("org/beta", 10).unwrap();
    tree.repo("org/team/gamma", 10).unwrap();

    assert_eq!(sorted_paths(&tree, 1), vec![shallow.clone()]);
    assert_eq!(sorted_paths(&tree, 2), vec![shallow, nested]);
    assert_eq!(sorted_paths(&tree, 3).len(), 3);
}

#[test]
fn test_does_not_descend_into_repositories() {
    let tree = FakeRepoTree::new().expect("Failed to create temp directory");
    let outer = tree.repo("outer", 10).unwrap();
    tree.repo("outer/vendored", 10).unwrap();

    assert_eq!(sorted_paths(&tree, 5), vec![outer]);
}

#[test]
fn test_size_hint_comes_from_index() {
    let tree = FakeRepoTree::new().expect("Failed to create temp directory");
    tree.repo("small", 3).unwrap();
    tree.repo("large", 4096).unwrap();

    let mut repos = scan_repos(tree.path(), 2);
    repos.sort_by(|a, b| a.path.cmp(&b.path));

    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].size_hint, 4096);
    assert_eq!(repos[1].size_hint, 3);
}

#[test]
fn test_plain_directories_and_files_are_ignored() {
    let tree = FakeRepoTree::new().expect("Failed to create temp directory");
    tree.dir("empty/inner").unwrap();
    tree.dir("nogit/.git").unwrap();
    std::fs::write(tree.path().join("README.md"), "not a repo").unwrap();

    assert!(scan_repos(tree.path(), 3).is_empty());
}

#[test]
fn test_missing_root_yields_nothing() {
    let tree = FakeRepoTree::new().expect("Failed to create temp directory");
    let missing = tree.path().join("does-not-exist");

    assert!(scan_repos(missing, 2).is_empty());
}

#[test]
fn test_filter_after_scan() {
    let tree = FakeRepoTree::new().expect("Failed to create temp directory");
    tree.repo("foo-bar", 1).unwrap();
    tree.repo("foo-baz", 1).unwrap();
    tree.repo("Qux", 1).unwrap();

    let spec = FilterSpec::parse("foo-, !-BAZ");
    let kept = filter_repos(scan_repos(tree.path(), 1), &spec);

    assert_eq!(kept.len(), 1);
    assert!(kept[0].path.ends_with("foo-bar"));

    let everything = filter_repos(scan_repos(tree.path(), 1), &FilterSpec::parse(""));
    assert_eq!(everything.len(), 3);
}

#[test]
fn test_finds_real_repositories() {
    if !is_git_available() {
        eprintln!("Git not available, skipping test");
        return;
    }

    let tree = FakeRepoTree::new().expect("Failed to create temp directory");
    create_multiple_repos(tree.path(), 5).expect("Failed to create repos");

    let repos = scan_repos(tree.path(), 1);
    assert_eq!(repos.len(), 5, "Should find all 5 repositories");
    assert!(repos.iter().all(|repo| repo.size_hint > 0));
}
