//! Common test utilities for integration tests.
//!
//! This module provides helpers for building seeded databases and services
//! on a manually driven clock.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use seathold::config::StreamOptions;
use seathold::operations::FixedFailure;
use seathold::{Database, DatabaseConfig, ManualClock, Notifier, SeatService};

/// The instant every test clock starts at.
#[allow(dead_code)]
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// Creates a database file in a fresh temporary directory, seeded with
/// `labels`, and returns its path.
///
/// The directory outlives the test so that several connections can share
/// the file.
#[allow(dead_code)]
pub fn seeded_database_path(labels: &[&str]) -> PathBuf {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seats.db");
    // Keep the temp_dir alive by forgetting it - this is a test helper
    std::mem::forget(dir);

    let mut db = open(&path);
    db.seed_seats(labels, t0()).unwrap();
    path
}

/// Opens another connection to an existing database file.
#[allow(dead_code)]
pub fn open(path: &Path) -> Database {
    Database::open(DatabaseConfig::new(path)).unwrap()
}

/// A seeded single-connection database.
#[allow(dead_code)]
pub fn seeded_database(labels: &[&str]) -> Database {
    open(&seeded_database_path(labels))
}

/// A service on a manual clock at [`t0`] that never injects failures.
#[allow(dead_code)]
pub fn service() -> (Arc<ManualClock>, SeatService) {
    service_with(StreamOptions::default())
}

/// Like [`service`], with explicit stream tuning.
#[allow(dead_code)]
pub fn service_with(options: StreamOptions) -> (Arc<ManualClock>, SeatService) {
    let clock = Arc::new(ManualClock::new(t0()));
    let notifier = Arc::new(Notifier::new(clock.clone(), options));
    let service = SeatService::new(clock.clone(), notifier)
        .with_failure_injector(Arc::new(FixedFailure::never()));
    (clock, service)
}
