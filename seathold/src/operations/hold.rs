//! Taking a hold, and sweeping lapsed ones.

use chrono::DateTime;
use chrono::Utc;
use rusqlite::Transaction;

use crate::database::{commit, Database};
use crate::error::{Error, ErrorKind, Result};
use crate::seat::{validate_token, Seat, SeatStatus, SeatView};

use super::{load_seat, SeatService};

struct HoldOutcome {
    seat: Seat,
    changed: bool,
}

impl SeatService {
    /// Places a hold on a seat for `token`.
    ///
    /// Lapsed holds everywhere are released first. Holding a seat you
    /// already hold is a no-op that returns the current view. Otherwise the
    /// hold is taken with one conditional update, which is what arbitrates
    /// between concurrent callers.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for a blank or oversized token
    /// - [`Error::SeatNotFound`] for an unknown seat
    /// - [`Error::AlreadyReserved`] if the seat is committed
    /// - [`Error::HeldByOthers`] if another token holds it
    /// - [`Error::LockTimeout`] if the write lock is not acquired in time
    pub fn hold(&self, db: &mut Database, seat_id: i64, token: &str) -> Result<SeatView> {
        validate_token(token)?;
        let now = self.now();
        let busy_millis = db.busy_timeout_millis();
        let tx = db.begin_transaction()?;

        // The sweep stands even when the hold is refused; only faults roll back.
        let outcome = match self.hold_locked(&tx, seat_id, token, now) {
            Err(err) if err.kind() == ErrorKind::Internal => return Err(err),
            other => other,
        };
        commit(tx, busy_millis)?;

        let outcome = outcome?;
        if outcome.changed {
            log::info!(
                "seat {seat_id} held until {}",
                outcome
                    .seat
                    .hold_expires_at()
                    .map_or_else(|| "-".to_string(), |at| at.to_rfc3339())
            );
            self.publish(&outcome.seat);
        }
        Ok(outcome.seat.view_for(Some(token), now))
    }

    fn hold_locked(
        &self,
        tx: &Transaction<'_>,
        seat_id: i64,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<HoldOutcome> {
        let released = Database::release_expired_holds(tx, now)?;
        if !released.is_empty() {
            log::debug!("released lapsed holds on seats {released:?}");
        }

        let seat = load_seat(tx, seat_id)?;
        if seat.status() == SeatStatus::Reserved {
            return Err(Error::AlreadyReserved { seat_id });
        }
        if seat.is_live_hold(now) {
            if seat.is_held_by(token) {
                return Ok(HoldOutcome {
                    seat,
                    changed: false,
                });
            }
            return Err(Error::HeldByOthers { seat_id });
        }

        let expires_at = now + self.policy.hold_ttl;
        if Database::try_acquire_hold(tx, seat_id, token, expires_at, now)? == 1 {
            return Ok(HoldOutcome {
                seat: load_seat(tx, seat_id)?,
                changed: true,
            });
        }

        // Lost the conditional update; the winner decides the error.
        Err(lost_race_error(&load_seat(tx, seat_id)?))
    }

    /// Releases every lapsed hold and broadcasts each released seat.
    ///
    /// Returns how many seats were released.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be updated.
    pub fn sweep_expired(&self, db: &mut Database) -> Result<usize> {
        let now = self.now();
        let busy_millis = db.busy_timeout_millis();
        let tx = db.begin_transaction()?;

        let released = Database::release_expired_holds(&tx, now)?;
        let seats = released
            .iter()
            .map(|&id| load_seat(&tx, id))
            .collect::<Result<Vec<_>>>()?;
        commit(tx, busy_millis)?;

        if !seats.is_empty() {
            log::info!("swept {} lapsed holds", seats.len());
        }
        for seat in &seats {
            self.publish(seat);
        }
        Ok(seats.len())
    }
}

/// Classifies a seat re-read after its conditional hold matched no row.
///
/// Under the IMMEDIATE write lock the row cannot change between the checks
/// and the update, so only a corrupted store reaches this.
fn lost_race_error(latest: &Seat) -> Error {
    let seat_id = latest.id();
    match latest.status() {
        SeatStatus::Reserved => Error::AlreadyReserved { seat_id },
        SeatStatus::Held => Error::HeldByOthers { seat_id },
        observed @ SeatStatus::Available => {
            log::error!(
                "hold on seat {seat_id} lost its conditional update but the seat is {observed}"
            );
            Error::UnreachableState {
                seat_id,
                observed: Some(observed),
                details: "conditional hold matched no row for an available seat".into(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_seeded_database, t0};
    use crate::notifier::{SeatEvent, TryRecvError};
    use crate::operations::test_util::service;
    use chrono::Duration;

    #[test]
    fn test_hold_available_seat() {
        let (_clock, service) = service();
        let mut db = create_seeded_database(&["A1"]);

        let view = service.hold(&mut db, 1, "tok1").unwrap();
        assert_eq!(view.status, SeatStatus::Held);
        assert!(view.held_by_me);
        assert_eq!(view.hold_expires_at, Some(t0() + Duration::seconds(90)));
    }

    #[test]
    fn test_hold_unknown_seat() {
        let (_clock, service) = service();
        let mut db = create_seeded_database(&["A1"]);
        assert!(matches!(
            service.hold(&mut db, 9, "tok1"),
            Err(Error::SeatNotFound { seat_id: 9 })
        ));
    }

    #[test]
    fn test_hold_rejects_blank_token() {
        let (_clock, service) = service();
        let mut db = create_seeded_database(&["A1"]);
        assert!(matches!(
            service.hold(&mut db, 1, "  "),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_hold_is_idempotent_without_broadcast() {
        let (clock, service) = service();
        let mut db = create_seeded_database(&["A1"]);
        let sub = service.notifier().subscribe(None);

        let first = service.hold(&mut db, 1, "tok1").unwrap();
        clock.advance(Duration::seconds(10));
        let second = service.hold(&mut db, 1, "tok1").unwrap();

        assert_eq!(first, second);
        assert!(sub.try_recv().is_ok());
        assert!(matches!(sub.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_hold_by_other_token_conflicts() {
        let (_clock, service) = service();
        let mut db = create_seeded_database(&["A1"]);

        service.hold(&mut db, 1, "tok1").unwrap();
        assert!(matches!(
            service.hold(&mut db, 1, "tok2"),
            Err(Error::HeldByOthers { seat_id: 1 })
        ));
    }

    #[test]
    fn test_lapsed_hold_is_reclaimable() {
        let (clock, service) = service();
        let mut db = create_seeded_database(&["A1"]);

        service.hold(&mut db, 1, "tok1").unwrap();
        clock.advance(Duration::seconds(90));

        let view = service.hold(&mut db, 1, "tok2").unwrap();
        assert!(view.held_by_me);
        let seat = Database::get_seat(db.connection(), 1).unwrap().unwrap();
        assert_eq!(seat.hold_token(), Some("tok2"));
    }

    #[test]
    fn test_refused_hold_still_sweeps() {
        let (clock, service) = service();
        let mut db = create_seeded_database(&["A1", "A2"]);

        service.hold(&mut db, 1, "tok1").unwrap();
        clock.advance(Duration::seconds(30));
        service.hold(&mut db, 2, "tok2").unwrap();
        clock.advance(Duration::seconds(60));

        // Seat 2 is still live, but seat 1 lapsed and is swept on the way.
        assert!(service.hold(&mut db, 2, "tok3").is_err());
        let first = Database::get_seat(db.connection(), 1).unwrap().unwrap();
        assert_eq!(first.status(), SeatStatus::Available);
    }

    #[test]
    fn test_sweep_broadcasts_each_released_seat() {
        let (clock, service) = service();
        let mut db = create_seeded_database(&["A1", "A2", "A3"]);
        service.hold(&mut db, 1, "a").unwrap();
        service.hold(&mut db, 2, "b").unwrap();

        let sub = service.notifier().subscribe(None);
        clock.advance(Duration::seconds(91));

        assert_eq!(service.sweep_expired(&mut db).unwrap(), 2);
        assert_eq!(service.sweep_expired(&mut db).unwrap(), 0);

        for _ in 0..2 {
            match sub.try_recv().unwrap() {
                SeatEvent::SeatUpdate(seat) => assert_eq!(seat.status(), SeatStatus::Available),
                SeatEvent::Ping => panic!("unexpected ping"),
            }
        }
        assert!(sub.try_recv().is_err());
    }

    fn stored(status: SeatStatus, token: Option<&str>) -> Seat {
        Seat::from_parts(
            4,
            "B1".into(),
            status,
            token.map(str::to_string),
            token.map(|_| t0() + Duration::seconds(90)),
            None,
            t0(),
            t0(),
        )
    }

    #[test]
    fn test_lost_race_classification() {
        assert!(matches!(
            lost_race_error(&stored(SeatStatus::Reserved, None)),
            Error::AlreadyReserved { seat_id: 4 }
        ));
        assert!(matches!(
            lost_race_error(&stored(SeatStatus::Held, Some("tok2"))),
            Error::HeldByOthers { seat_id: 4 }
        ));

        let err = lost_race_error(&stored(SeatStatus::Available, None));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(matches!(
            err,
            Error::UnreachableState {
                seat_id: 4,
                observed: Some(SeatStatus::Available),
                ..
            }
        ));
    }

    #[test]
    fn test_conditional_hold_skips_reserved_and_live_rows() {
        let (_clock, service) = service();
        let mut db = create_seeded_database(&["A1", "A2"]);
        service.hold(&mut db, 1, "tok1").unwrap();
        service
            .commit(
                &mut db,
                1,
                "tok1",
                &crate::operations::CommitRequest::new("Kim", "010"),
            )
            .unwrap();
        service.hold(&mut db, 2, "tok2").unwrap();

        let conn = db.connection();
        let later = t0() + Duration::seconds(10);
        let expires = later + Duration::seconds(90);
        assert_eq!(Database::try_acquire_hold(conn, 1, "tok3", expires, later).unwrap(), 0);
        assert_eq!(Database::try_acquire_hold(conn, 2, "tok3", expires, later).unwrap(), 0);

        let reserved = Database::get_seat(conn, 1).unwrap().unwrap();
        assert!(matches!(lost_race_error(&reserved), Error::AlreadyReserved { seat_id: 1 }));
        let held = Database::get_seat(conn, 2).unwrap().unwrap();
        assert!(matches!(lost_race_error(&held), Error::HeldByOthers { seat_id: 2 }));
    }
}
