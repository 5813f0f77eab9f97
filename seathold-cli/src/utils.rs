//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including data directory resolution, configuration loading, database
//! management, and output formatting.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::CliError;
use seathold::database::default_data_dir;
use seathold::operations::seed_default_seats;
use seathold::{Config, ConfigBuilder, Database, DatabaseConfig, SeatService, SystemClock};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u32>,

    /// Client token identifying this caller's holds.
    pub token: Option<String>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,
}

impl GlobalOptions {
    /// Returns the client token, which hold, heartbeat, and commit require.
    pub fn require_token(&self) -> Result<&str, CliError> {
        self.token.as_deref().ok_or_else(|| {
            CliError::InvalidArguments(
                "--token (or SEATHOLD_CLIENT_TOKEN) is required for this command".into(),
            )
        })
    }
}

/// Resolve the data directory: `--data-dir`, `SEATHOLD_DATA_DIR`, else `~/.seathold`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => default_data_dir().map_err(|e| CliError::Config(e.to_string())),
    }
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Environment variables (highest priority)
/// 2. `config.yaml` in the data directory
/// 3. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;

    ConfigBuilder::new()
        .with_data_dir(&data_dir)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Open database with configuration.
///
/// A missing database is created and seeded with the configured seat grid
/// unless auto-init is disabled.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is disabled.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let db_config = DatabaseConfig::in_data_dir(resolve_data_dir(global)?);
    let existed = db_config.path.exists();

    if !existed && global.disable_autoinit {
        return Err(CliError::NoDataDirectory);
    }

    let busy_timeout = global.busy_timeout.map_or_else(
        || config.lock_wait(),
        |seconds| std::time::Duration::from_secs(seconds.into()),
    );
    let mut db = Database::open(db_config.with_busy_timeout(busy_timeout))?;

    if !existed {
        seed_default_seats(&mut db, &config.seed_config(), Utc::now())?;
    }

    Ok(db)
}

/// Builds the seat service on the wall clock with configured timing and failure rate.
pub fn build_service(config: &Config) -> SeatService {
    SeatService::from_config(config, Arc::new(SystemClock))
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}

/// Format a timestamp for display.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
