//! Integration tests for the `init` command.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_init_creates_and_seeds_database() {
    let env = TestEnv::new();

    env.command()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created database"))
        .stdout(predicate::str::contains("A1, A2, A3, B1, B2, B3, C1, C2, C3"));

    assert!(env.database_path().exists());
}

#[test]
fn test_init_twice_requires_overwrite() {
    let env = TestEnv::new();
    env.init();

    let body = env.error_body(
        {
            let mut cmd = env.command();
            cmd.arg("init");
            cmd
        },
        4,
    );
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["message"].as_str().unwrap().contains("--overwrite"));

    env.command()
        .args(["init", "--overwrite"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recreated database"));
}

#[test]
fn test_init_with_config_writes_template() {
    let env = TestEnv::new();

    env.command()
        .args(["init", "--with-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created default configuration file"));

    let content = std::fs::read_to_string(env.data_dir.join("config.yaml")).unwrap();
    assert!(content.contains("ttl_seconds"));
}

#[test]
fn test_init_uses_configured_grid() {
    let env = TestEnv::new();
    std::fs::create_dir_all(&env.data_dir).unwrap();
    std::fs::write(
        env.data_dir.join("config.yaml"),
        "seed:\n  rows: [X, Y]\n  columns: 2\n",
    )
    .unwrap();

    env.command()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("X1, X2, Y1, Y2"));
}

#[test]
fn test_init_dry_run_changes_nothing() {
    let env = TestEnv::new();

    env.command()
        .args(["init", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry-run mode"));

    assert!(!env.data_dir.exists());
}
