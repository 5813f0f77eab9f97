//! Data directory initialization and seeding.
//!
//! This module creates the seathold data directory and database, optionally
//! writes a commented configuration file, and seeds the seat grid.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::config::{SeedConfig, CONFIG_FILE_NAME};
use crate::error::{Error, Result};
use crate::{Database, DatabaseConfig};

/// Options for database initialization.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Data directory to initialize.
    pub data_dir: PathBuf,
    /// Overwrite existing database if it exists.
    pub overwrite: bool,
    /// Create a default configuration file.
    pub create_config: bool,
    /// Seat grid to seed into a fresh database.
    pub seed: SeedConfig,
}

impl InitOptions {
    /// Creates new initialization options with the default seat grid.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            overwrite: false,
            create_config: false,
            seed: SeedConfig::default(),
        }
    }

    /// Sets whether to overwrite existing database.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether to create default configuration file.
    #[must_use]
    pub fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }

    /// Sets the seat grid.
    #[must_use]
    pub fn with_seed(mut self, seed: SeedConfig) -> Self {
        self.seed = seed;
        self
    }
}

/// Result of initialization operation.
#[derive(Debug)]
pub struct InitResult {
    /// Whether the data directory was created.
    pub data_dir_created: bool,
    /// Whether the database was created or recreated.
    pub database_created: bool,
    /// Whether a configuration file was created.
    pub config_created: bool,
    /// Labels of the seats inserted.
    pub seeded: Vec<String>,
    /// Path to the data directory.
    pub data_dir: PathBuf,
}

/// Default minimal configuration template.
const DEFAULT_CONFIG_TEMPLATE: &str = r"# Seathold Configuration File
# Every key is optional; the values shown are the defaults.

# hold:
#   ttl_seconds: 90
#   heartbeat_extend_seconds: 60

# Probability that a commit fails on purpose and releases the seat
# commit:
#   failure_rate: 0.01

# stream:
#   idle_timeout_seconds: 300
#   keepalive_seconds: 15
#   buffer: 64

# Seat grid created in an empty database
# seed:
#   rows: [A, B, C]
#   columns: 3

# Maximum lock wait time in seconds (default: 5)
# maximum_lock_wait_seconds: 5
";

/// Initializes the seathold data directory and database.
///
/// This function creates the data directory if needed, initializes the database,
/// optionally creates a default configuration file, and seeds the seat grid.
///
/// # Errors
///
/// Returns an error if:
/// - The data directory cannot be created
/// - The database cannot be initialized or seeded
/// - The configuration file cannot be written
/// - Overwrite is false and the database already exists
///
/// # Examples
///
/// ```no_run
/// use seathold::operations::init::{InitOptions, init_database};
/// use std::path::PathBuf;
///
/// let options = InitOptions::new(PathBuf::from("/tmp/seathold-test"))
///     .with_create_config(true);
///
/// let result = init_database(&options).unwrap();
/// println!("seeded {:?}", result.seeded);
/// ```
pub fn init_database(options: &InitOptions) -> Result<InitResult> {
    let mut result = InitResult {
        data_dir_created: false,
        database_created: false,
        config_created: false,
        seeded: Vec::new(),
        data_dir: options.data_dir.clone(),
    };

    if !options.data_dir.exists() {
        fs::create_dir_all(&options.data_dir)?;
        result.data_dir_created = true;
    }

    let db_config = DatabaseConfig::in_data_dir(&options.data_dir);
    let db_path = &db_config.path;
    let db_exists = db_path.exists();

    if db_exists && !options.overwrite {
        return Err(Error::Validation {
            field: "database".into(),
            message: format!(
                "Database already exists at {}. Use --overwrite to replace it.",
                db_path.display()
            ),
        });
    }

    if db_exists {
        fs::remove_file(db_path)?;
        // WAL side files belong to the old database.
        for side in db_config.side_files() {
            if side.exists() {
                fs::remove_file(side)?;
            }
        }
    }

    let mut db = Database::open(db_config)?;
    result.database_created = true;
    result.seeded = seed_default_seats(&mut db, &options.seed, Utc::now())?;

    if options.create_config {
        let config_path = options.data_dir.join(CONFIG_FILE_NAME);

        // Only create if it doesn't exist
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
            result.config_created = true;
        }
    }

    Ok(result)
}

/// Seeds the seat grid if the store has no seats yet.
///
/// Returns the labels inserted, which is empty when seats already exist.
///
/// # Errors
///
/// Returns an error if the store cannot be read or written.
pub fn seed_default_seats(
    db: &mut Database,
    seed: &SeedConfig,
    now: DateTime<Utc>,
) -> Result<Vec<String>> {
    let labels = seed.labels();
    let existing = db.seed_if_empty(&labels, now)?;
    if existing > 0 {
        log::info!("{existing} seats already present, skipping seed");
        return Ok(Vec::new());
    }

    log::info!("seeded {} seats", labels.len());
    Ok(labels)
}
