//! CLI argument parsing tests for Overwatch

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

fn overwatch() -> Command {
    Command::new(env!("CARGO_BIN_EXE_overwatch"))
}

#[test]
fn test_help_flag() {
    overwatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "A tool-using chat operative with a second-opinion reviewer",
        ))
        .stdout(predicate::str::contains("--help"))
        .stdout(predicate::str::contains("--version"));
}

#[test]
fn test_version_flag() {
    overwatch()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_no_args_shows_help() {
    overwatch()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_unknown_subcommand_fails() {
    overwatch()
        .arg("launch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_help_lists_subcommands() {
    let assert = overwatch().arg("--help").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    for sub in ["init", "engage", "history", "clear", "tools", "status"] {
        assert!(stdout.contains(sub), "help is missing {}: {}", sub, stdout);
    }
}

#[test]
fn test_init_command_help() {
    overwatch()
        .args(["init", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialize"));
}

#[test]
fn test_engage_command_help() {
    overwatch()
        .args(["engage", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--message"));
}

#[test]
fn test_engage_message_requires_value() {
    overwatch()
        .args(["engage", "--message"])
        .assert()
        .failure();
}

#[test]
fn test_verbose_is_global() {
    overwatch()
        .args(["status", "--help", "--verbose"])
        .assert()
        .success();
}
