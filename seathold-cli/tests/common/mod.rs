//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers for common patterns
//! - JSON parsing helpers for command output

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the seathold data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    ///
    /// The data directory path is not created; seathold creates it.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("seathold-data");

        Self { temp_dir, data_dir }
    }

    /// Get a bare command builder without pre-configured flags.
    ///
    /// Inherited `SEATHOLD_*` variables are cleared and failure injection
    /// is turned off so commits are deterministic.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("seathold").expect("Failed to find seathold binary");
        for var in [
            "SEATHOLD_DATA_DIR",
            "SEATHOLD_CLIENT_TOKEN",
            "SEATHOLD_BUSY_TIMEOUT",
            "SEATHOLD_DISABLE_AUTOINIT",
            "SEATHOLD_OUTPUT_FORMAT",
            "SEATHOLD_LOG_MODE",
        ] {
            cmd.env_remove(var);
        }
        cmd.env("SEATHOLD_FAILURE_RATE", "0");
        cmd
    }

    /// Get a command builder with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// A command acting as the client `token`.
    pub fn as_client(&self, token: &str) -> Command {
        let mut cmd = self.command();
        cmd.arg("--token").arg(token);
        cmd
    }

    /// Initialize the data directory with the default seat grid.
    pub fn init(&self) {
        self.command().args(["--quiet", "init"]).assert().success();
    }

    /// Run a command that must succeed and parse its stdout as JSON.
    pub fn json(&self, mut cmd: Command) -> serde_json::Value {
        let output = cmd.assert().success().get_output().stdout.clone();
        serde_json::from_slice(&output).expect("stdout should be JSON")
    }

    /// Run a command that must fail and parse its stderr as an error body.
    pub fn error_body(&self, mut cmd: Command, exit_code: i32) -> serde_json::Value {
        let output = cmd.assert().code(exit_code).get_output().stderr.clone();
        let text = String::from_utf8(output).expect("stderr should be UTF-8");
        let line = text
            .lines()
            .rev()
            .find(|l| l.starts_with('{'))
            .expect("stderr should contain an error body");
        serde_json::from_str(line).expect("error body should be JSON")
    }

    /// Path to the database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("seathold.db")
    }
}
