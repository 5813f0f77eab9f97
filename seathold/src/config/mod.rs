//! Configuration system for seathold.
//!
//! This module provides layered configuration with support for:
//! - A YAML file at `{data_dir}/config.yaml`
//! - Environment variable overrides
//! - Programmatic configuration via builder pattern
//! - Validation of the merged result
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`SEATHOLD_*`)
//! 3. Data directory config (`~/.seathold/config.yaml`)
//! 4. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use seathold::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new().build().unwrap();
//! println!("holds last {}s", config.hold_policy().hold_ttl.num_seconds());
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource, CONFIG_FILE_NAME};
pub use merger::ConfigMerger;
pub use schema::{
    CommitConfig, Config, HoldConfig, HoldPolicy, SeedConfig, StreamConfig, StreamOptions,
};
pub use validator::ConfigValidator;
