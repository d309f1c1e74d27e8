//! End-to-end CLI tests for the book-ripper binary.

use assert_cmd::Command;
use predicates::prelude::*;

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("book-ripper").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Borrow a book from archive.org"))
        .stdout(predicate::str::contains("--all-pages"))
        .stdout(predicate::str::contains("--page-start"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("book-ripper").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

/// Test that invalid flags cause non-zero exit.
#[test]
fn test_binary_invalid_flag_returns_error() {
    let mut cmd = Command::cargo_bin("book-ripper").unwrap();
    cmd.arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// Test that a zero page number is rejected before anything else runs.
#[test]
fn test_binary_rejects_page_start_zero() {
    let mut cmd = Command::cargo_bin("book-ripper").unwrap();
    cmd.args(["someBook00", "--page-start", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("page-start"));
}

/// Test that a missing book id with closed stdin fails instead of hanging.
#[test]
fn test_binary_without_id_and_no_stdin_fails() {
    let temp = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("book-ripper").unwrap();
    cmd.env("XDG_CONFIG_HOME", temp.path())
        .current_dir(temp.path())
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("book id"));
}

/// Test that declining to reuse an existing output folder exits cleanly.
#[test]
fn test_binary_declined_overwrite_exits_zero() {
    let temp = tempfile::tempdir().unwrap();
    let existing = temp.path().join("pages");
    std::fs::create_dir(&existing).unwrap();

    let mut cmd = Command::cargo_bin("book-ripper").unwrap();
    cmd.env("XDG_CONFIG_HOME", temp.path())
        .args(["someBook00", "-u", "reader@example.com", "-p", "pw"])
        .arg("--output-dir")
        .arg(&existing)
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists. Continue?"));
}

/// Test that all-pages mode accepts explicit bounds instead of rejecting them.
#[test]
fn test_binary_all_pages_with_bounds_is_not_a_usage_error() {
    let temp = tempfile::tempdir().unwrap();
    let existing = temp.path().join("pages");
    std::fs::create_dir(&existing).unwrap();

    let mut cmd = Command::cargo_bin("book-ripper").unwrap();
    cmd.env("XDG_CONFIG_HOME", temp.path())
        .args(["someBook00", "-u", "reader@example.com", "-p", "pw"])
        .args(["-a", "-s", "2"])
        .arg("--output-dir")
        .arg(&existing)
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("cannot be used with").not());
}
