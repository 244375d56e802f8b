// tests/binary_exit_status.rs
#![cfg(unix)]

use std::path::Path;
use std::process::{Command, Output};

fn two_unit_tree() -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    for unit in ["a", "b"] {
        std::fs::create_dir_all(tmp.path().join(unit)).unwrap();
        std::fs::write(tmp.path().join(unit).join("Cargo.toml"), "[package]\n").unwrap();
    }
    tmp
}

fn unitpipe(root: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_unitpipe"))
        .arg("--root")
        .arg(root)
        .args(["--strategy", "walk", "--no-notify"])
        .args(extra)
        .env("UNITPIPE_LOG", "warn")
        .output()
        .unwrap()
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn failing_tool_exits_one_and_names_the_failure_last() {
    let tmp = two_unit_tree();
    let output = unitpipe(tmp.path(), &["--tool", "false"]);

    assert_eq!(output.status.code(), Some(1));
    let lines = stdout_lines(&output);
    assert_eq!(lines, vec!["==> [clean] a", "!! clean failed for a: exit code 1"]);
}

#[test]
fn succeeding_tool_exits_zero() {
    let tmp = two_unit_tree();
    let output = unitpipe(tmp.path(), &["--tool", "true", "--stage", "check", "--stage", "fmt"]);

    assert_eq!(output.status.code(), Some(0));
    let lines = stdout_lines(&output);
    assert_eq!(
        &lines[..4],
        &["==> [check] a", "==> [fmt] a", "==> [check] b", "==> [fmt] b"]
    );
    assert!(lines[4].contains("completed 4 stage(s) across 2 unit(s)"));
}

#[test]
fn missing_explicit_config_exits_two_without_running() {
    let tmp = two_unit_tree();
    let missing = tmp.path().join("absent.toml");
    let output = unitpipe(
        tmp.path(),
        &["--tool", "true", "--config", missing.to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout_lines(&output).is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unitpipe error"));
}
