//! CLI surface tests.

#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_help_describes_the_pipeline() {
    Command::cargo_bin("respcorpus")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("respiratory"))
        .stdout(predicate::str::contains("--icbhi-dir"))
        .stdout(predicate::str::contains("--output-dir"));
}

#[test]
fn test_missing_raw_root_exits_nonzero() {
    let out = TempDir::new().unwrap();

    Command::cargo_bin("respcorpus")
        .unwrap()
        .args([
            "--icbhi-dir",
            "/nonexistent/icbhi",
            "--kaggle-dir",
            "/nonexistent/kaggle",
            "--resp-tr-dir",
            "/nonexistent/resp_tr",
            "--output-dir",
        ])
        .arg(out.path())
        .arg("--quiet")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_explicit_missing_config_file_exits_nonzero() {
    Command::cargo_bin("respcorpus")
        .unwrap()
        .args(["--config", "/nonexistent/respcorpus.toml", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_quiet_and_verbose_conflict() {
    Command::cargo_bin("respcorpus")
        .unwrap()
        .args(["--quiet", "-v"])
        .assert()
        .failure();
}
