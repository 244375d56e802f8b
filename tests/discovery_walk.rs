// tests/discovery_walk.rs

use std::path::Path;

use unitpipe::discovery::{walk_units, ExclusionSet};
use unitpipe::errors::UnitpipeError;
use unitpipe::fs::RealFileSystem;
use unitpipe_test_utils::builders::{walk_discovery, UnitTreeBuilder, TEST_MANIFEST, TEST_ROOT};
use unitpipe_test_utils::{init_tracing, with_timeout};

async fn discovered_keys(tree: UnitTreeBuilder, exclude: &[&str]) -> Vec<String> {
    let discovery = walk_discovery(tree.build(), exclude);
    with_timeout(discovery.discover())
        .await
        .unwrap()
        .iter()
        .map(|u| u.key().to_string())
        .collect()
}

#[tokio::test]
async fn nested_units_and_excluded_vendor() {
    init_tracing();

    let tree = UnitTreeBuilder::new()
        .unit("a")
        .unit("a/b")
        .unit("vendor");

    assert_eq!(discovered_keys(tree, &["vendor"]).await, vec!["a", "a/b"]);
}

#[tokio::test]
async fn excluded_directory_is_never_descended_into() {
    init_tracing();

    let tree = UnitTreeBuilder::new()
        .unit("app")
        .unit("target/debug/build/generated")
        .unit("app/node_modules/dep")
        .unit("app/lib");

    assert_eq!(
        discovered_keys(tree, &["target", "node_modules"]).await,
        vec!["app", "app/lib"]
    );
}

#[tokio::test]
async fn parent_with_qualifying_child_yields_two_units() {
    init_tracing();

    let tree = UnitTreeBuilder::new().unit("outer").unit("outer/inner");
    assert_eq!(discovered_keys(tree, &[]).await, vec!["outer", "outer/inner"]);
}

#[tokio::test]
async fn units_below_plain_directories_are_found() {
    init_tracing();

    let tree = UnitTreeBuilder::new()
        .dir("docs")
        .file("README.md", "# repo")
        .unit("crates/core")
        .unit("crates/cli");

    assert_eq!(
        discovered_keys(tree, &[]).await,
        vec!["crates/cli", "crates/core"]
    );
}

#[tokio::test]
async fn hidden_directories_excluded_by_glob() {
    init_tracing();

    let tree = UnitTreeBuilder::new().unit(".cache/x").unit("real");
    assert_eq!(discovered_keys(tree, &[".*"]).await, vec!["real"]);
}

#[tokio::test]
async fn symlink_loop_terminates() {
    init_tracing();

    let tree = UnitTreeBuilder::new()
        .unit("a")
        .symlink("a/back", "..")
        .symlink("a/self", ".")
        .unit("b");

    assert_eq!(discovered_keys(tree, &[]).await, vec!["a", "b"]);
}

#[test]
fn missing_root_is_a_discovery_error() {
    let fs = UnitTreeBuilder::new().build();
    let err = walk_units(
        &fs,
        Path::new("elsewhere"),
        TEST_MANIFEST,
        &ExclusionSet::defaults().unwrap(),
    )
    .unwrap_err();

    assert!(matches!(err, UnitpipeError::Discovery(_)));
}

#[test]
fn root_is_not_itself_a_unit_when_walking() {
    let fs = UnitTreeBuilder::new().file(TEST_MANIFEST, "").unit("child").build();
    let units = walk_units(
        &fs,
        Path::new(TEST_ROOT),
        TEST_MANIFEST,
        &ExclusionSet::defaults().unwrap(),
    )
    .unwrap();

    let keys: Vec<_> = units.iter().map(|u| u.key()).collect();
    assert_eq!(keys, vec!["child"]);
}

#[test]
fn real_filesystem_walk() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    for dir in ["svc/api", "svc/api/plugin", "vendor/lib", "tools"] {
        std::fs::create_dir_all(root.join(dir)).unwrap();
    }
    for dir in ["svc/api", "svc/api/plugin", "vendor/lib"] {
        std::fs::write(root.join(dir).join("Cargo.toml"), "[package]\n").unwrap();
    }

    let units = walk_units(
        &RealFileSystem,
        root,
        "Cargo.toml",
        &ExclusionSet::new(&["vendor"]).unwrap(),
    )
    .unwrap();

    let keys: Vec<_> = units.iter().map(|u| u.key()).collect();
    assert_eq!(keys, vec!["svc/api", "svc/api/plugin"]);
    assert_eq!(units[0].dir(), root.join("svc/api"));
    assert_eq!(units[0].manifest(), root.join("svc/api/Cargo.toml"));
}

#[cfg(unix)]
#[test]
fn real_symlink_cycle_terminates() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    std::fs::create_dir_all(root.join("a")).unwrap();
    std::fs::write(root.join("a/Cargo.toml"), "").unwrap();
    std::os::unix::fs::symlink(root, root.join("a/loop")).unwrap();

    let units = walk_units(
        &RealFileSystem,
        root,
        "Cargo.toml",
        &ExclusionSet::defaults().unwrap(),
    )
    .unwrap();

    let keys: Vec<_> = units.iter().map(|u| u.key()).collect();
    assert_eq!(keys, vec!["a"]);
}
