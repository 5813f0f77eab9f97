//! Configuration validation.
//!
//! This module checks that every configured value is usable before any
//! component is built from it.

use crate::config::schema::{CommitConfig, Config, HoldConfig, SeedConfig, StreamConfig};
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Largest accepted number of seats per row.
pub const MAX_SEED_COLUMNS: u32 = 99;

/// Validates configuration.
///
/// # Examples
///
/// ```
/// use seathold::config::{Config, ConfigValidator};
///
/// let config = Config::default();
/// ConfigValidator::validate(&config).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref hold) = config.hold {
            Self::validate_hold(hold)?;
        }

        if let Some(ref commit) = config.commit {
            Self::validate_commit(commit)?;
        }

        if let Some(ref stream) = config.stream {
            Self::validate_stream(stream)?;
        }

        if let Some(ref seed) = config.seed {
            Self::validate_seed(seed)?;
        }

        if let Some(timeout) = config.maximum_lock_wait_seconds {
            if timeout == 0 {
                return Err(Error::Validation {
                    field: "maximum_lock_wait_seconds".into(),
                    message: "Timeout must be greater than 0".into(),
                });
            }
        }

        Ok(())
    }

    fn validate_hold(hold: &HoldConfig) -> Result<()> {
        Self::positive("hold.ttl_seconds", hold.ttl_seconds)?;
        Self::positive(
            "hold.heartbeat_extend_seconds",
            hold.heartbeat_extend_seconds,
        )
    }

    fn validate_commit(commit: &CommitConfig) -> Result<()> {
        if let Some(rate) = commit.failure_rate {
            if !(0.0..=1.0).contains(&rate) {
                return Err(Error::Validation {
                    field: "commit.failure_rate".into(),
                    message: format!("Must be between 0 and 1, got {rate}"),
                });
            }
        }
        Ok(())
    }

    fn validate_stream(stream: &StreamConfig) -> Result<()> {
        Self::positive("stream.idle_timeout_seconds", stream.idle_timeout_seconds)?;
        Self::positive("stream.keepalive_seconds", stream.keepalive_seconds)?;
        if stream.buffer == Some(0) {
            return Err(Error::Validation {
                field: "stream.buffer".into(),
                message: "Buffer must hold at least one event".into(),
            });
        }
        Ok(())
    }

    /// Rows must be distinct single letters `A`-`Z`; columns 1-99.
    fn validate_seed(seed: &SeedConfig) -> Result<()> {
        if let Some(ref rows) = seed.rows {
            if rows.is_empty() {
                return Err(Error::Validation {
                    field: "seed.rows".into(),
                    message: "At least one row is required".into(),
                });
            }

            let mut seen = HashSet::new();
            for row in rows {
                let is_letter = row.len() == 1 && row.bytes().all(|b| b.is_ascii_uppercase());
                if !is_letter {
                    return Err(Error::Validation {
                        field: "seed.rows".into(),
                        message: format!("Row '{row}' must be a single letter A-Z"),
                    });
                }
                if !seen.insert(row.as_str()) {
                    return Err(Error::Validation {
                        field: "seed.rows".into(),
                        message: format!("Duplicate row '{row}'"),
                    });
                }
            }
        }

        if let Some(columns) = seed.columns {
            if columns == 0 || columns > MAX_SEED_COLUMNS {
                return Err(Error::Validation {
                    field: "seed.columns".into(),
                    message: format!("Columns must be between 1 and {MAX_SEED_COLUMNS}"),
                });
            }
        }

        Ok(())
    }

    fn positive(field: &str, value: Option<u64>) -> Result<()> {
        if value == Some(0) {
            return Err(Error::Validation {
                field: field.into(),
                message: "Must be greater than 0".into(),
            });
        }
        Ok(())
    }
}
