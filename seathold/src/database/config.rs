//! Where the seat store lives and how long a writer waits for the lock.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Name of the database file inside the data directory.
pub const DATABASE_FILE_NAME: &str = "seathold.db";

/// Default wait for another connection's write transaction.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection parameters for the seat store.
///
/// Every hold, heartbeat, and commit takes the database write lock, so
/// `busy_timeout` bounds how long a contended operation queues before it
/// fails with a lock timeout.
///
/// # Examples
///
/// ```
/// use seathold::database::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::in_data_dir("/var/lib/seathold")
///     .with_busy_timeout(Duration::from_millis(250));
/// assert!(config.path.ends_with("seathold.db"));
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the database file. Parent directories are created on open.
    pub path: PathBuf,
    /// Busy timeout for write-lock contention.
    pub busy_timeout: Duration,
}

impl DatabaseConfig {
    /// Targets an explicit database file.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    /// Targets [`DATABASE_FILE_NAME`] inside `data_dir`.
    #[must_use]
    pub fn in_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(DATABASE_FILE_NAME))
    }

    /// Sets the busy timeout.
    #[must_use]
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Busy timeout in whole milliseconds, as reported by lock timeouts.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn busy_timeout_millis(&self) -> u64 {
        self.busy_timeout.as_millis() as u64
    }

    /// The WAL side files SQLite keeps next to the database.
    #[must_use]
    pub fn side_files(&self) -> [PathBuf; 2] {
        let mut wal = self.path.clone().into_os_string();
        wal.push("-wal");
        let mut shm = self.path.clone().into_os_string();
        shm.push("-shm");
        [PathBuf::from(wal), PathBuf::from(shm)]
    }
}

/// Returns the default data directory, `~/.seathold`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_data_dir() -> Result<PathBuf> {
    home::home_dir()
        .map(|home| home.join(".seathold"))
        .ok_or_else(|| Error::validation("home_directory", "Cannot determine home directory"))
}
