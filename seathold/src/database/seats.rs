//! Seat store operations.
//!
//! Reads take no lock. Every write runs on a connection the caller has
//! already put inside an IMMEDIATE transaction, except the two single
//! statement primitives, which are atomic on their own.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::error::Result;
use crate::seat::{Seat, SeatStatus};

use super::connection::Database;
use super::schema::SEAT_COLUMNS;
use super::transaction::commit;

/// Converts an instant to Unix epoch milliseconds for storage.
pub(super) fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

/// Converts stored Unix epoch milliseconds back to an instant.
pub(super) fn from_millis(idx: usize, millis: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp {millis} out of range").into(),
        )
    })
}

fn optional_millis(idx: usize, millis: Option<i64>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    millis.map(|m| from_millis(idx, m)).transpose()
}

/// Deserializes a seat from a row selected with [`SEAT_COLUMNS`].
fn row_to_seat(row: &rusqlite::Row<'_>) -> rusqlite::Result<Seat> {
    let status: String = row.get(2)?;
    let status = status
        .parse::<SeatStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;

    Ok(Seat::from_parts(
        row.get(0)?,
        row.get(1)?,
        status,
        row.get(3)?,
        optional_millis(4, row.get(4)?)?,
        optional_millis(5, row.get(5)?)?,
        from_millis(6, row.get(6)?)?,
        from_millis(7, row.get(7)?)?,
    ))
}

// Hold is granted only to a free seat or over a lapsed hold. This one
// statement is the whole arbitration between racing holders.
const TRY_ACQUIRE_HOLD: &str = r"
    UPDATE seats
    SET status = 'HELD', hold_token = ?2, hold_expires_at = ?3, updated_at = ?4
    WHERE id = ?1
      AND (status = 'AVAILABLE'
           OR (status = 'HELD' AND (hold_expires_at IS NULL OR hold_expires_at <= ?4)))
";

const RELEASE_EXPIRED_HOLDS: &str = r"
    UPDATE seats
    SET status = 'AVAILABLE', hold_token = NULL, hold_expires_at = NULL, updated_at = ?1
    WHERE status = 'HELD' AND hold_expires_at IS NOT NULL AND hold_expires_at <= ?1
    RETURNING id
";

const UPDATE_SEAT: &str = r"
    UPDATE seats
    SET status = ?2, hold_token = ?3, hold_expires_at = ?4, reserved_at = ?5, updated_at = ?6
    WHERE id = ?1
";

const INSERT_SEAT: &str = r"
    INSERT INTO seats (label, status, created_at, updated_at)
    VALUES (?1, 'AVAILABLE', ?2, ?2)
";

impl Database {
    /// Lists every seat ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be decoded.
    pub fn get_all_seats(conn: &Connection) -> Result<Vec<Seat>> {
        let mut stmt = conn.prepare(&format!("SELECT {SEAT_COLUMNS} FROM seats ORDER BY id"))?;
        let seats = stmt
            .query_map([], row_to_seat)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(seats)
    }

    /// Loads one seat.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_seat(conn: &Connection, seat_id: i64) -> Result<Option<Seat>> {
        let seat = conn
            .query_row(
                &format!("SELECT {SEAT_COLUMNS} FROM seats WHERE id = ?"),
                [seat_id],
                row_to_seat,
            )
            .optional()?;
        Ok(seat)
    }

    /// Loads one seat while holding the write lock.
    ///
    /// Only callable inside a transaction. Transactions are begun with
    /// IMMEDIATE behavior, so the database write lock is already held and
    /// stays held until commit or rollback.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_seat_for_update(tx: &Transaction<'_>, seat_id: i64) -> Result<Option<Seat>> {
        Self::get_seat(tx, seat_id)
    }

    /// Attempts to take a hold on a seat in one conditional update.
    ///
    /// Succeeds only if the seat is `AVAILABLE`, or `HELD` with an expiry
    /// that is missing or not after `now`. Returns the number of rows
    /// affected, 0 or 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn try_acquire_hold(
        conn: &Connection,
        seat_id: i64,
        token: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let affected = conn.execute(
            TRY_ACQUIRE_HOLD,
            params![seat_id, token, to_millis(expires_at), to_millis(now)],
        )?;
        Ok(affected)
    }

    /// Releases every hold whose expiry is at or before `now`.
    ///
    /// Returns the ids of the released seats. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn release_expired_holds(conn: &Connection, now: DateTime<Utc>) -> Result<Vec<i64>> {
        let mut stmt = conn.prepare(RELEASE_EXPIRED_HOLDS)?;
        let ids = stmt
            .query_map([to_millis(now)], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }

    /// Persists every mutable column of `seat`.
    ///
    /// Returns `false` if no row has the seat's id.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_seat(conn: &Connection, seat: &Seat) -> Result<bool> {
        let affected = conn.execute(
            UPDATE_SEAT,
            params![
                seat.id(),
                seat.status().as_str(),
                seat.hold_token(),
                seat.hold_expires_at().map(to_millis),
                seat.reserved_at().map(to_millis),
                to_millis(seat.updated_at()),
            ],
        )?;
        Ok(affected > 0)
    }

    /// Counts the seats in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_seats(conn: &Connection) -> Result<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM seats", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Inserts `labels` only if the store has no seats, in one transaction.
    ///
    /// The emptiness check runs under the write lock, so concurrent callers
    /// on a fresh file converge: one inserts, the rest see its seats.
    /// Returns how many seats existed before, zero when this call seeded.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or any insert
    /// fails.
    pub fn seed_if_empty<S: AsRef<str>>(
        &mut self,
        labels: &[S],
        now: DateTime<Utc>,
    ) -> Result<i64> {
        let busy_millis = self.busy_timeout_millis();
        let tx = self.begin_transaction()?;
        let existing = Self::count_seats(&tx)?;
        if existing == 0 {
            let mut stmt = tx.prepare(INSERT_SEAT)?;
            for label in labels {
                stmt.execute(params![label.as_ref(), to_millis(now)])?;
            }
        }
        commit(tx, busy_millis)?;
        Ok(existing)
    }

    /// Inserts `labels` as `AVAILABLE` seats in one transaction.
    ///
    /// Either every label is inserted or none are.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started or any insert
    /// fails, including on a duplicate label.
    pub fn seed_seats<S: AsRef<str>>(&mut self, labels: &[S], now: DateTime<Utc>) -> Result<usize> {
        let busy_millis = self.busy_timeout_millis();
        let tx = self.begin_transaction()?;
        {
            let mut stmt = tx.prepare(INSERT_SEAT)?;
            for label in labels {
                stmt.execute(params![label.as_ref(), to_millis(now)])?;
            }
        }
        commit(tx, busy_millis)?;
        Ok(labels.len())
    }
}
