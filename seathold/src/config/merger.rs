//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::{CommitConfig, Config, HoldConfig, SeedConfig, StreamConfig};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use seathold::config::{Config, ConfigMerger};
///
/// let low = Config { maximum_lock_wait_seconds: Some(1), ..Default::default() };
/// let high = Config { maximum_lock_wait_seconds: Some(9), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.maximum_lock_wait_seconds, Some(9));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into final config.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();

        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }

        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// Nested sections merge field by field; the seed grid's row list is
    /// replaced as a whole.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if let Some(ref source_hold) = source.hold {
            target.hold = Some(match &target.hold {
                Some(target_hold) => Self::merge_hold(target_hold, source_hold),
                None => source_hold.clone(),
            });
        }

        if let Some(ref source_commit) = source.commit {
            target.commit = Some(match &target.commit {
                Some(target_commit) => CommitConfig {
                    failure_rate: source_commit.failure_rate.or(target_commit.failure_rate),
                },
                None => source_commit.clone(),
            });
        }

        if let Some(ref source_stream) = source.stream {
            target.stream = Some(match &target.stream {
                Some(target_stream) => Self::merge_stream(target_stream, source_stream),
                None => source_stream.clone(),
            });
        }

        if let Some(ref source_seed) = source.seed {
            target.seed = Some(match &target.seed {
                Some(target_seed) => SeedConfig {
                    rows: source_seed.rows.clone().or_else(|| target_seed.rows.clone()),
                    columns: source_seed.columns.or(target_seed.columns),
                },
                None => source_seed.clone(),
            });
        }
    }

    fn merge_hold(target: &HoldConfig, source: &HoldConfig) -> HoldConfig {
        HoldConfig {
            ttl_seconds: source.ttl_seconds.or(target.ttl_seconds),
            heartbeat_extend_seconds: source
                .heartbeat_extend_seconds
                .or(target.heartbeat_extend_seconds),
        }
    }

    fn merge_stream(target: &StreamConfig, source: &StreamConfig) -> StreamConfig {
        StreamConfig {
            idle_timeout_seconds: source.idle_timeout_seconds.or(target.idle_timeout_seconds),
            keepalive_seconds: source.keepalive_seconds.or(target.keepalive_seconds),
            buffer: source.buffer.or(target.buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn make_source(precedence: u8, config: Config) -> ConfigSource {
        ConfigSource {
            path: PathBuf::from(format!("test-{precedence}.yaml")),
            precedence,
            config,
        }
    }

    #[test]
    fn test_merge_overwrites() {
        let mut target = Config {
            maximum_lock_wait_seconds: Some(1),
            ..Default::default()
        };
        let source = Config {
            maximum_lock_wait_seconds: Some(2),
            ..Default::default()
        };

        ConfigMerger::merge_into(&mut target, &source);
        assert_eq!(target.maximum_lock_wait_seconds, Some(2));
    }

    #[test]
    fn test_merge_nested_field_by_field() {
        let mut target = Config {
            hold: Some(HoldConfig {
                ttl_seconds: Some(30),
                heartbeat_extend_seconds: Some(10),
            }),
            ..Default::default()
        };
        let source = Config {
            hold: Some(HoldConfig {
                ttl_seconds: None,
                heartbeat_extend_seconds: Some(20),
            }),
            ..Default::default()
        };

        ConfigMerger::merge_into(&mut target, &source);
        let hold = target.hold.unwrap();
        assert_eq!(hold.ttl_seconds, Some(30));
        assert_eq!(hold.heartbeat_extend_seconds, Some(20));
    }

    #[test]
    fn test_merge_keeps_target_when_source_absent() {
        let mut target = Config {
            commit: Some(CommitConfig {
                failure_rate: Some(0.0),
            }),
            ..Default::default()
        };
        ConfigMerger::merge_into(&mut target, &Config::default());
        assert_eq!(target.commit.unwrap().failure_rate, Some(0.0));
    }

    #[test]
    fn test_merge_sources_in_order() {
        let low = make_source(
            1,
            Config {
                stream: Some(StreamConfig {
                    buffer: Some(8),
                    keepalive_seconds: Some(5),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );
        let high = make_source(
            2,
            Config {
                stream: Some(StreamConfig {
                    buffer: Some(16),
                    ..Default::default()
                }),
                ..Default::default()
            },
        );

        let merged = ConfigMerger::merge(vec![low, high]);
        let stream = merged.stream.unwrap();
        assert_eq!(stream.buffer, Some(16));
        assert_eq!(stream.keepalive_seconds, Some(5));
    }
}
