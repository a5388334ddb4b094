//! CLI surface integration tests: spawn the actual `mcp-engine` binary
//! and assert on its one-shot behavior (version/help/validation), mirroring
//! the pattern used for the subagent config tests.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_version_flag_prints_package_version() {
    let mut cmd = Command::cargo_bin("mcp-engine").unwrap();
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag_lists_serve_subcommand() {
    let mut cmd = Command::cargo_bin("mcp-engine").unwrap();
    cmd.arg("--help");
    cmd.assert().success().stdout(predicate::str::contains("serve"));
}

#[test]
fn test_missing_subcommand_fails() {
    let mut cmd = Command::cargo_bin("mcp-engine").unwrap();
    cmd.assert().failure();
}

#[test]
fn test_serve_rejects_nonexistent_project_root() {
    let mut cmd = Command::cargo_bin("mcp-engine").unwrap();
    cmd.arg("serve")
        .arg("--project-root")
        .arg("/does/not/exist/anywhere")
        .arg("--stdio");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("rootPath"));
}
