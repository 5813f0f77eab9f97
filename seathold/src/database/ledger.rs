//! Reservation ledger operations.
//!
//! The ledger is append-only. The UNIQUE constraint on `seat_id` enforces
//! one reservation per seat even if the state machine were bypassed.

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::reservation::{ContactDetails, Reservation};

use super::connection::Database;
use super::schema::RESERVATION_COLUMNS;
use super::seats::{from_millis, to_millis};

const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations (id, seat_id, client_token, name, phone, reserved_at, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
";

/// Deserializes a reservation from a row selected with [`RESERVATION_COLUMNS`].
fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    let seat_id: i64 = row.get(1)?;
    let client_token: String = row.get(2)?;
    let name: String = row.get(3)?;
    let phone: String = row.get(4)?;

    let contact = ContactDetails::new(name, phone)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(
        Reservation::builder(seat_id, client_token, contact, from_millis(5, row.get(5)?)?)
            .id(id)
            .created_at(from_millis(6, row.get(6)?)?)
            .build(),
    )
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
                && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
    )
}

impl Database {
    /// Checks whether a reservation exists for a seat.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn reservation_exists(conn: &Connection, seat_id: i64) -> Result<bool> {
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM reservations WHERE seat_id = ?)",
            [seat_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Loads the reservation for a seat, if committed.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the row cannot be decoded.
    pub fn find_reservation_by_seat(conn: &Connection, seat_id: i64) -> Result<Option<Reservation>> {
        let reservation = conn
            .query_row(
                &format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE seat_id = ?"),
                [seat_id],
                row_to_reservation,
            )
            .optional()?;
        Ok(reservation)
    }

    /// Appends a reservation to the ledger.
    ///
    /// Intended for use inside the caller's transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UniqueConstraintViolation`] if the seat already has
    /// a reservation, or a database error if the insert fails otherwise.
    pub fn save_reservation(conn: &Connection, reservation: &Reservation) -> Result<()> {
        conn.execute(
            INSERT_RESERVATION,
            params![
                reservation.id().to_string(),
                reservation.seat_id(),
                reservation.client_token(),
                reservation.name(),
                reservation.phone(),
                to_millis(reservation.reserved_at()),
                to_millis(reservation.created_at()),
            ],
        )
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::UniqueConstraintViolation {
                    seat_id: reservation.seat_id(),
                }
            } else {
                e.into()
            }
        })?;
        Ok(())
    }

    /// Lists every reservation ordered by seat.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn list_reservations(conn: &Connection) -> Result<Vec<Reservation>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations ORDER BY seat_id"
        ))?;
        let reservations = stmt
            .query_map([], row_to_reservation)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reservations)
    }
}
