//! Database connection management.
//!
//! This module provides the main database connection type with proper
//! initialization and PRAGMA settings for optimal `SQLite` configuration.

use rusqlite::{Connection, OpenFlags};

use crate::error::Result;

use super::config::DatabaseConfig;

/// A database connection wrapper with configuration.
///
/// One `Database` serves one caller at a time. Concurrent callers open
/// their own `Database` against the same file; WAL mode lets readers
/// proceed while a single writer holds the write lock.
///
/// # Examples
///
/// ```no_run
/// use seathold::database::{Database, DatabaseConfig};
///
/// let config = DatabaseConfig::new("/tmp/seathold.db");
/// let db = Database::open(config).unwrap();
/// ```
#[derive(Debug)]
pub struct Database {
    pub(super) conn: Connection,
    config: DatabaseConfig,
}

impl Database {
    /// Opens the seat store, creating the file and schema if needed.
    ///
    /// The connection runs in WAL mode with foreign keys enforced, and waits
    /// up to the configured busy timeout for other writers.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created, the file
    /// cannot be opened, or the schema on disk is from an unsupported version.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            &config.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        // Busy timeout first so the WAL switch and schema setup wait out
        // other connections initializing the same file.
        conn.busy_timeout(config.busy_timeout)?;

        // PRAGMA journal_mode returns a row, so it needs query_row
        let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.execute_batch("PRAGMA synchronous = NORMAL; PRAGMA foreign_keys = ON")?;

        super::migrations::check_schema_compatibility(&conn)?;

        log::debug!("opened seat store at {}", config.path.display());

        Ok(Self { conn, config })
    }

    /// Returns a reference to the underlying `SQLite` connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns the configuration this connection was opened with.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Busy timeout in whole milliseconds, as reported by lock timeouts.
    #[must_use]
    pub(crate) fn busy_timeout_millis(&self) -> u64 {
        self.config.busy_timeout_millis()
    }
}
