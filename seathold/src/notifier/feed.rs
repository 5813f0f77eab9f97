//! Cross-process change detection.
//!
//! Writers in other processes never reach this process's [`Notifier`]. A
//! watcher polls the store through a [`ChangeFeed`] and re-broadcasts the
//! seats that changed since its previous poll.
//!
//! [`Notifier`]: super::Notifier

use std::collections::HashMap;

use rusqlite::Connection;

use crate::database::Database;
use crate::error::Result;
use crate::seat::Seat;

/// Remembers the last seen record of every seat.
#[derive(Debug, Default)]
pub struct ChangeFeed {
    seen: HashMap<i64, Seat>,
}

impl ChangeFeed {
    /// Creates a feed that treats every seat as new.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `seats` as seen without reporting them.
    pub fn prime(&mut self, seats: &[Seat]) {
        for seat in seats {
            self.seen.insert(seat.id(), seat.clone());
        }
    }

    /// Returns the seats that differ from the last seen record, in the
    /// order given, and remembers them.
    pub fn diff(&mut self, seats: Vec<Seat>) -> Vec<Seat> {
        seats
            .into_iter()
            .filter(|seat| {
                let changed = self.seen.get(&seat.id()) != Some(seat);
                if changed {
                    self.seen.insert(seat.id(), seat.clone());
                }
                changed
            })
            .collect()
    }

    /// Reads every seat and returns those changed since the last poll.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn poll(&mut self, conn: &Connection) -> Result<Vec<Seat>> {
        let seats = Database::get_all_seats(conn)?;
        Ok(self.diff(seats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_seeded_database, t0};
    use chrono::Duration;

    #[test]
    fn test_first_poll_reports_everything() {
        let db = create_seeded_database(&["A1", "A2"]);
        let mut feed = ChangeFeed::new();
        assert_eq!(feed.poll(db.connection()).unwrap().len(), 2);
        assert!(feed.poll(db.connection()).unwrap().is_empty());
    }

    #[test]
    fn test_poll_reports_only_changed_seats() {
        let db = create_seeded_database(&["A1", "A2"]);
        let conn = db.connection();

        let mut feed = ChangeFeed::new();
        feed.prime(&Database::get_all_seats(conn).unwrap());

        Database::try_acquire_hold(conn, 2, "tok", t0() + Duration::seconds(90), t0()).unwrap();

        let changed = feed.poll(conn).unwrap();
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].label(), "A2");
        assert!(feed.poll(conn).unwrap().is_empty());
    }
}
