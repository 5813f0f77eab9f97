//! Shared test utilities for database unit tests.

use chrono::{DateTime, TimeZone, Utc};
use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};

/// A fixed instant tests measure from.
#[must_use]
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// Creates a temporary test database that will be cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let config = DatabaseConfig::new(path);
    let db = Database::open(config).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    db
}

/// Creates a test database seeded with `labels` at [`t0`].
///
/// Seat ids follow label order starting at 1.
///
/// # Panics
///
/// Panics if the database cannot be created or seeded.
#[must_use]
pub fn create_seeded_database(labels: &[&str]) -> Database {
    let mut db = create_test_database();
    db.seed_seats(labels, t0()).unwrap();
    db
}
