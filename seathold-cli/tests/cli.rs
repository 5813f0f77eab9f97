//! Top-level CLI behavior: help, version, and completions.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let env = TestEnv::new();

    env.command_bare()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("hold"))
        .stdout(predicate::str::contains("heartbeat"))
        .stdout(predicate::str::contains("commit"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn test_version() {
    let env = TestEnv::new();

    env.command_bare()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_bash_completions() {
    let env = TestEnv::new();

    env.command_bare()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("seathold"));
}

#[test]
fn test_token_from_environment() {
    let env = TestEnv::new();
    env.init();

    env.command()
        .env("SEATHOLD_CLIENT_TOKEN", "tok-env")
        .args(["hold", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"heldByMe\": true"));
}

#[test]
fn test_data_dir_from_environment() {
    let env = TestEnv::new();

    env.command_bare()
        .env("SEATHOLD_DATA_DIR", &env.data_dir)
        .args(["--quiet", "init"])
        .assert()
        .success();
    assert!(env.database_path().exists());
}
