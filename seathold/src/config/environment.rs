//! Environment variable handling for configuration overrides.
//!
//! This module provides support for `SEATHOLD_*` environment variables that
//! override configuration file values.

use crate::config::schema::Config;
use crate::error::{Error, Result};
use std::env;
use std::str::FromStr;

/// Handles environment variable overrides for configuration.
///
/// | Variable | Field |
/// |---|---|
/// | `SEATHOLD_HOLD_TTL_SECONDS` | `hold.ttl_seconds` |
/// | `SEATHOLD_HEARTBEAT_EXTEND_SECONDS` | `hold.heartbeat_extend_seconds` |
/// | `SEATHOLD_FAILURE_RATE` | `commit.failure_rate` |
/// | `SEATHOLD_STREAM_IDLE_TIMEOUT_SECONDS` | `stream.idle_timeout_seconds` |
/// | `SEATHOLD_STREAM_KEEPALIVE_SECONDS` | `stream.keepalive_seconds` |
/// | `SEATHOLD_STREAM_BUFFER` | `stream.buffer` |
/// | `SEATHOLD_SEED_ROWS` | `seed.rows` (comma-separated) |
/// | `SEATHOLD_SEED_COLUMNS` | `seed.columns` |
/// | `SEATHOLD_MAXIMUM_LOCK_WAIT_SECONDS` | `maximum_lock_wait_seconds` |
///
/// # Examples
///
/// ```no_run
/// use seathold::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the variable if any value cannot
    /// be parsed.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Some(ttl) = Self::number("SEATHOLD_HOLD_TTL_SECONDS")? {
            config.hold.get_or_insert_with(Default::default).ttl_seconds = Some(ttl);
        }

        if let Some(extend) = Self::number("SEATHOLD_HEARTBEAT_EXTEND_SECONDS")? {
            config
                .hold
                .get_or_insert_with(Default::default)
                .heartbeat_extend_seconds = Some(extend);
        }

        if let Some(rate) = Self::number("SEATHOLD_FAILURE_RATE")? {
            config.commit.get_or_insert_with(Default::default).failure_rate = Some(rate);
        }

        Self::apply_stream_overrides(config)?;
        Self::apply_seed_overrides(config)?;

        if let Some(seconds) = Self::number("SEATHOLD_MAXIMUM_LOCK_WAIT_SECONDS")? {
            config.maximum_lock_wait_seconds = Some(seconds);
        }

        Ok(())
    }

    fn apply_stream_overrides(config: &mut Config) -> Result<()> {
        if let Some(idle) = Self::number("SEATHOLD_STREAM_IDLE_TIMEOUT_SECONDS")? {
            config
                .stream
                .get_or_insert_with(Default::default)
                .idle_timeout_seconds = Some(idle);
        }

        if let Some(keepalive) = Self::number("SEATHOLD_STREAM_KEEPALIVE_SECONDS")? {
            config
                .stream
                .get_or_insert_with(Default::default)
                .keepalive_seconds = Some(keepalive);
        }

        if let Some(buffer) = Self::number("SEATHOLD_STREAM_BUFFER")? {
            config.stream.get_or_insert_with(Default::default).buffer = Some(buffer);
        }

        Ok(())
    }

    fn apply_seed_overrides(config: &mut Config) -> Result<()> {
        if let Ok(rows) = env::var("SEATHOLD_SEED_ROWS") {
            let rows: Vec<String> = rows
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .collect();
            config.seed.get_or_insert_with(Default::default).rows = Some(rows);
        }

        if let Some(columns) = Self::number("SEATHOLD_SEED_COLUMNS")? {
            config.seed.get_or_insert_with(Default::default).columns = Some(columns);
        }

        Ok(())
    }

    /// Reads and parses a numeric variable, `None` if unset.
    fn number<T: FromStr>(var: &str) -> Result<Option<T>> {
        match env::var(var) {
            Ok(value) => value.trim().parse().map(Some).map_err(|_| Error::Validation {
                field: var.into(),
                message: format!("Invalid number: '{value}'"),
            }),
            Err(_) => Ok(None),
        }
    }
}
