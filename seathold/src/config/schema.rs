//! Configuration schema definitions.
//!
//! This module defines the configuration structure for seathold: hold
//! timing, commit failure injection, update stream tuning, and the seed
//! grid. Every field is optional so partial files merge cleanly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default hold time-to-live, in seconds.
pub const DEFAULT_HOLD_TTL_SECONDS: u64 = 90;
/// Default heartbeat extension, in seconds.
pub const DEFAULT_HEARTBEAT_EXTEND_SECONDS: u64 = 60;
/// Default probability that a commit is aborted by failure injection.
pub const DEFAULT_FAILURE_RATE: f64 = 0.01;
/// Default idle timeout for update subscribers, in seconds.
pub const DEFAULT_IDLE_TIMEOUT_SECONDS: u64 = 300;
/// Default keepalive ping interval, in seconds.
pub const DEFAULT_KEEPALIVE_SECONDS: u64 = 15;
/// Default per-subscriber buffer, in events.
pub const DEFAULT_STREAM_BUFFER: usize = 64;
/// Default seed rows.
pub const DEFAULT_SEED_ROWS: [&str; 3] = ["A", "B", "C"];
/// Default seats per seed row.
pub const DEFAULT_SEED_COLUMNS: u32 = 3;
/// Default maximum lock wait, in seconds.
pub const DEFAULT_LOCK_WAIT_SECONDS: u64 = 5;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use seathold::config::{Config, HoldConfig};
///
/// let config = Config {
///     hold: Some(HoldConfig {
///         ttl_seconds: Some(120),
///         heartbeat_extend_seconds: None,
///     }),
///     ..Default::default()
/// };
/// assert_eq!(config.hold_policy().hold_ttl.num_seconds(), 120);
/// assert_eq!(config.hold_policy().heartbeat_extend.num_seconds(), 60);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Hold timing.
    pub hold: Option<HoldConfig>,

    /// Commit behavior.
    pub commit: Option<CommitConfig>,

    /// Update stream tuning.
    pub stream: Option<StreamConfig>,

    /// Initial seat grid.
    pub seed: Option<SeedConfig>,

    /// Maximum time to wait for database lock acquisition (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,
}

/// Hold timing configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HoldConfig {
    /// How long a fresh hold lasts.
    pub ttl_seconds: Option<u64>,
    /// How far a heartbeat pushes the expiry.
    pub heartbeat_extend_seconds: Option<u64>,
}

/// Commit configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CommitConfig {
    /// Probability in `[0, 1]` that a commit is aborted and the seat released.
    pub failure_rate: Option<f64>,
}

/// Update stream configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StreamConfig {
    /// Subscribers silent for longer than this are dropped.
    pub idle_timeout_seconds: Option<u64>,
    /// Interval between keepalive pings.
    pub keepalive_seconds: Option<u64>,
    /// Events buffered per subscriber before it is considered too slow.
    pub buffer: Option<usize>,
}

/// Seed grid configuration.
///
/// Labels are row letter followed by column number, e.g. `B2`.
///
/// # Examples
///
/// ```
/// use seathold::config::SeedConfig;
///
/// let seed = SeedConfig {
///     rows: Some(vec!["A".into(), "B".into()]),
///     columns: Some(2),
/// };
/// assert_eq!(seed.labels(), ["A1", "A2", "B1", "B2"]);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SeedConfig {
    /// Row letters, in order.
    pub rows: Option<Vec<String>>,
    /// Seats per row.
    pub columns: Option<u32>,
}

impl SeedConfig {
    /// Expands the grid into labels in row-major order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        let columns = self.columns.unwrap_or(DEFAULT_SEED_COLUMNS);
        let rows: Vec<String> = self.rows.clone().unwrap_or_else(|| {
            DEFAULT_SEED_ROWS.iter().map(|r| (*r).to_string()).collect()
        });

        rows.iter()
            .flat_map(|row| (1..=columns).map(move |col| format!("{row}{col}")))
            .collect()
    }
}

/// Resolved hold timing used by the seat service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldPolicy {
    /// Lifetime of a fresh hold.
    pub hold_ttl: chrono::Duration,
    /// Extension applied by a heartbeat.
    pub heartbeat_extend: chrono::Duration,
}

impl Default for HoldPolicy {
    fn default() -> Self {
        Self {
            hold_ttl: seconds(DEFAULT_HOLD_TTL_SECONDS),
            heartbeat_extend: seconds(DEFAULT_HEARTBEAT_EXTEND_SECONDS),
        }
    }
}

#[allow(clippy::cast_possible_wrap)]
fn seconds(secs: u64) -> chrono::Duration {
    chrono::Duration::seconds(secs.min(i64::MAX as u64 / 1000) as i64)
}

/// Resolved notifier tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    /// Subscribers silent for longer than this are dropped.
    pub idle_timeout: chrono::Duration,
    /// Interval between keepalive pings.
    pub keepalive: Duration,
    /// Events buffered per subscriber.
    pub buffer: usize,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            idle_timeout: seconds(DEFAULT_IDLE_TIMEOUT_SECONDS),
            keepalive: Duration::from_secs(DEFAULT_KEEPALIVE_SECONDS),
            buffer: DEFAULT_STREAM_BUFFER,
        }
    }
}

impl Config {
    /// Hold timing with defaults filled in.
    #[must_use]
    pub fn hold_policy(&self) -> HoldPolicy {
        let hold = self.hold.clone().unwrap_or_default();
        HoldPolicy {
            hold_ttl: seconds(hold.ttl_seconds.unwrap_or(DEFAULT_HOLD_TTL_SECONDS)),
            heartbeat_extend: seconds(
                hold.heartbeat_extend_seconds
                    .unwrap_or(DEFAULT_HEARTBEAT_EXTEND_SECONDS),
            ),
        }
    }

    /// Commit failure probability with the default filled in.
    #[must_use]
    pub fn failure_rate(&self) -> f64 {
        self.commit
            .as_ref()
            .and_then(|c| c.failure_rate)
            .unwrap_or(DEFAULT_FAILURE_RATE)
    }

    /// Stream tuning with defaults filled in.
    #[must_use]
    pub fn stream_options(&self) -> StreamOptions {
        let stream = self.stream.clone().unwrap_or_default();
        StreamOptions {
            idle_timeout: seconds(
                stream
                    .idle_timeout_seconds
                    .unwrap_or(DEFAULT_IDLE_TIMEOUT_SECONDS),
            ),
            keepalive: Duration::from_secs(
                stream.keepalive_seconds.unwrap_or(DEFAULT_KEEPALIVE_SECONDS),
            ),
            buffer: stream.buffer.unwrap_or(DEFAULT_STREAM_BUFFER),
        }
    }

    /// Seed grid, default when unset.
    #[must_use]
    pub fn seed_config(&self) -> SeedConfig {
        self.seed.clone().unwrap_or_default()
    }

    /// Lock wait with the default filled in.
    #[must_use]
    pub fn lock_wait(&self) -> Duration {
        Duration::from_secs(
            self.maximum_lock_wait_seconds
                .unwrap_or(DEFAULT_LOCK_WAIT_SECONDS),
        )
    }
}
