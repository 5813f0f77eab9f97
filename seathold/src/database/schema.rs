//! Database schema definitions and SQL constants.
//!
//! This module contains all SQL table definitions, indices, and constants
//! related to the database schema for the seat store and reservation ledger.

/// Current schema version for the database.
///
/// This version is stored in the metadata table and is used to ensure
/// compatibility between the database and the application.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the seats table.
///
/// Labels are unique. Instants are stored as Unix epoch milliseconds.
pub const CREATE_SEATS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS seats (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        label TEXT NOT NULL UNIQUE,
        status TEXT NOT NULL CHECK (status IN ('AVAILABLE', 'HELD', 'RESERVED')),
        hold_token TEXT,
        hold_expires_at INTEGER,
        reserved_at INTEGER,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )";

/// SQL statement to create the reservations (ledger) table.
///
/// The UNIQUE constraint on `seat_id` enforces one reservation per seat
/// independently of the state machine.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id TEXT PRIMARY KEY NOT NULL,
        seat_id INTEGER NOT NULL UNIQUE REFERENCES seats(id),
        client_token TEXT NOT NULL,
        name TEXT NOT NULL,
        phone TEXT NOT NULL,
        reserved_at INTEGER NOT NULL,
        created_at INTEGER NOT NULL
    )";

/// Index for sweeps and status filters.
pub const CREATE_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_seats_status ON seats(status)";

/// Index for expiry sweeps.
pub const CREATE_HOLD_EXPIRES_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_seats_hold_expires_at ON seats(hold_expires_at)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// Column list shared by every seat SELECT, in `row_to_seat` order.
pub const SEAT_COLUMNS: &str =
    "id, label, status, hold_token, hold_expires_at, reserved_at, created_at, updated_at";

/// Column list shared by every reservation SELECT, in `row_to_reservation` order.
pub const RESERVATION_COLUMNS: &str =
    "id, seat_id, client_token, name, phone, reserved_at, created_at";
