//! Transaction management utilities.
//!
//! Every mutating seat operation runs inside an IMMEDIATE transaction, so
//! the write lock is taken up front rather than on the first write.

use rusqlite::{Transaction, TransactionBehavior};

use crate::error::{map_busy, Result};

use super::connection::Database;

impl Database {
    /// Begins an IMMEDIATE transaction, acquiring the database write lock.
    ///
    /// Waits up to the configured busy timeout for another connection's
    /// write transaction to finish.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockTimeout`](crate::Error::LockTimeout) if the lock
    /// is not acquired within the busy timeout, or a database error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use seathold::database::{Database, DatabaseConfig};
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/seathold.db")).unwrap();
    /// let tx = db.begin_transaction().unwrap();
    /// let seat = Database::get_seat_for_update(&tx, 1).unwrap();
    /// tx.commit().unwrap();
    /// ```
    pub fn begin_transaction(&mut self) -> Result<Transaction<'_>> {
        let busy_millis = self.busy_timeout_millis();
        self.conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| map_busy(e, busy_millis))
    }
}

/// Commits `tx`, reporting a busy database as a lock timeout.
pub(crate) fn commit(tx: Transaction<'_>, busy_millis: u64) -> Result<()> {
    tx.commit().map_err(|e| map_busy(e, busy_millis))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseConfig;
    use crate::Error;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_rollback_on_drop() {
        let dir = tempdir().unwrap();
        let mut db = Database::open(DatabaseConfig::new(dir.path().join("test.db"))).unwrap();

        {
            let tx = db.begin_transaction().unwrap();
            tx.execute(
                "INSERT INTO seats (label, status, created_at, updated_at) VALUES ('A1', 'AVAILABLE', 0, 0)",
                [],
            )
            .unwrap();
        }

        assert_eq!(Database::count_seats(db.connection()).unwrap(), 0);
    }

    #[test]
    fn test_second_writer_times_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let mut first = Database::open(DatabaseConfig::new(&path)).unwrap();
        let mut second = Database::open(
            DatabaseConfig::new(&path).with_busy_timeout(Duration::from_millis(50)),
        )
        .unwrap();

        let _held = first.begin_transaction().unwrap();
        let err = second.begin_transaction().unwrap_err();
        assert!(matches!(err, Error::LockTimeout { millis: 50 }));
    }
}
