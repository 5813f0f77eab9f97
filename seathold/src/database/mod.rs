//! Database layer for the seat store and reservation ledger.
//!
//! This module provides a SQLite-based storage layer: connection
//! management, schema versioning, the seat store's atomic update
//! primitives, and the append-only reservation ledger.
//!
//! # Examples
//!
//! ```no_run
//! use chrono::Utc;
//! use seathold::database::{Database, DatabaseConfig};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/seathold.db")).unwrap();
//! db.seed_seats(&["A1", "A2"], Utc::now()).unwrap();
//!
//! for seat in Database::get_all_seats(db.connection()).unwrap() {
//!     println!("{} {}", seat.label(), seat.status());
//! }
//! ```

mod config;
mod connection;
mod ledger;
pub mod migrations;
mod schema;
mod seats;
mod transaction;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, DatabaseConfig, DATABASE_FILE_NAME, DEFAULT_BUSY_TIMEOUT,
};
pub use connection::Database;
pub(crate) use transaction::commit;

pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
