//! CLI smoke tests that don't require lando or composer.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Scaffold a minimal project directory with the given config contents.
fn scaffold_project(config: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join(".stagehand")).unwrap();
    fs::write(dir.path().join(".stagehand/config.yml"), config).unwrap();
    dir
}

#[test]
fn help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("stagehand").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("honk"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("drush"))
        .stdout(predicate::str::contains("reset"));
}

#[test]
fn honk_honks() {
    let mut cmd = Command::cargo_bin("stagehand").unwrap();
    cmd.arg("honk")
        .assert()
        .success()
        .stdout(predicate::str::contains("Honk!"));
}

#[test]
fn status_fails_outside_a_project() {
    let dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("stagehand").unwrap();
    cmd.current_dir(dir.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No project root found"));
}

#[test]
fn status_lists_every_tool() {
    let dir = scaffold_project("appType: drupal8\n");
    let mut cmd = Command::cargo_bin("stagehand").unwrap();
    let assert = cmd.current_dir(dir.path()).arg("status").assert().success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains("Project root:"), "missing header: {}", stdout);
    for tool in ["composer", "git", "lando"] {
        assert!(stdout.contains(tool), "missing {} row: {}", tool, stdout);
    }
}

#[test]
fn drush_requires_lando() {
    // No .lando.yml, so the lando tool stays disabled.
    let dir = scaffold_project("appType: drupal8\n");
    let mut cmd = Command::cargo_bin("stagehand").unwrap();
    cmd.current_dir(dir.path())
        .args(["drush", "status"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Cannot run without lando"));
}

#[test]
fn reset_requires_an_application_type() {
    let dir = scaffold_project("");
    let mut cmd = Command::cargo_bin("stagehand").unwrap();
    cmd.current_dir(dir.path())
        .arg("reset")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No application type specified"));
}

#[test]
fn reset_rejects_unknown_application_types() {
    let dir = scaffold_project("appType: wordpress\n");
    let mut cmd = Command::cargo_bin("stagehand").unwrap();
    cmd.current_dir(dir.path())
        .arg("reset")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unrecognized application type"));
}

#[test]
fn reset_refuses_to_reset_itself() {
    let dir = scaffold_project("appType: stagehand\n");
    let mut cmd = Command::cargo_bin("stagehand").unwrap();
    cmd.current_dir(dir.path())
        .arg("reset")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Can't reset self"));
}
