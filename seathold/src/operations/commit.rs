//! Committing a held seat into the ledger.

use serde::Deserialize;

use crate::database::{commit, Database};
use crate::error::{Error, Result};
use crate::reservation::{ContactDetails, Reservation, ReservationSummary};
use crate::seat::{validate_token, SeatStatus};

use super::SeatService;

/// Contact payload of a commit, as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitRequest {
    /// Contact name, 1-50 characters.
    pub name: String,
    /// Contact phone, 3-20 characters.
    pub phone: String,
}

impl CommitRequest {
    /// Creates a request.
    #[must_use]
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
        }
    }
}

impl SeatService {
    /// Commits `token`'s hold on a seat and records the reservation.
    ///
    /// The payload is validated before the store is touched. The seat is then
    /// loaded under the write lock, which serializes competing commits.
    ///
    /// A retry by the committing token against a seat it already reserved
    /// returns the stored summary unchanged. If the ledger already has a row
    /// for a still-held seat, the seat is forced to reserved and the existing
    /// row's summary is returned without writing a second one.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for a malformed token, name, or phone
    /// - [`Error::SeatNotFound`] for an unknown seat
    /// - [`Error::AlreadyReserved`] if another token committed the seat
    /// - [`Error::NotHeldByClient`] if `token` does not hold the seat
    /// - [`Error::HoldExpired`] if the hold has lapsed
    /// - [`Error::IntentionalFailure`] if the failure hook fired; the seat is
    ///   released and the caller may hold it again
    pub fn commit(
        &self,
        db: &mut Database,
        seat_id: i64,
        token: &str,
        request: &CommitRequest,
    ) -> Result<ReservationSummary> {
        validate_token(token)?;
        let contact = ContactDetails::new(&request.name, &request.phone)?;
        let now = self.now();
        let busy_millis = db.busy_timeout_millis();
        let tx = db.begin_transaction()?;

        let mut seat =
            Database::get_seat_for_update(&tx, seat_id)?.ok_or(Error::SeatNotFound { seat_id })?;

        if seat.status() == SeatStatus::Reserved {
            return match Database::find_reservation_by_seat(&tx, seat_id)? {
                Some(existing) if existing.client_token() == token => {
                    log::debug!("seat {seat_id} already committed by this client");
                    Ok(existing.summary())
                }
                _ => Err(Error::AlreadyReserved { seat_id }),
            };
        }
        if !seat.is_held_by(token) {
            return Err(Error::NotHeldByClient { seat_id });
        }
        if seat.hold_expired(now) {
            return Err(Error::HoldExpired { seat_id });
        }

        if self.failure.should_fail() {
            seat.release(now);
            Database::update_seat(&tx, &seat)?;
            commit(tx, busy_millis)?;

            log::warn!("simulated failure on commit of seat {seat_id}, seat released");
            self.publish(&seat);
            return Err(Error::IntentionalFailure { seat_id });
        }

        if let Some(existing) = Database::find_reservation_by_seat(&tx, seat_id)? {
            seat.mark_reserved(now);
            Database::update_seat(&tx, &seat)?;
            commit(tx, busy_millis)?;

            log::info!("seat {seat_id} already in ledger, marked reserved");
            self.publish(&seat);
            return Ok(existing.summary());
        }

        seat.mark_reserved(now);
        Database::update_seat(&tx, &seat)?;
        let reservation = Reservation::builder(seat_id, token, contact, now).build();
        Database::save_reservation(&tx, &reservation)?;
        commit(tx, busy_millis)?;

        log::info!("seat {seat_id} reserved as {}", reservation.id());
        self.publish(&seat);
        Ok(reservation.summary())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::database::test_util::{create_seeded_database, t0};
    use crate::notifier::SeatEvent;
    use crate::operations::test_util::service;
    use crate::operations::FixedFailure;
    use chrono::Duration;

    fn kim() -> CommitRequest {
        CommitRequest::new("Kim", "010-0000-0000")
    }

    #[test]
    fn test_commit_held_seat() {
        let (clock, service) = service();
        let mut db = create_seeded_database(&["A1"]);
        service.hold(&mut db, 1, "tok1").unwrap();
        clock.advance(Duration::seconds(5));

        let summary = service.commit(&mut db, 1, "tok1", &kim()).unwrap();
        assert_eq!(summary.seat_id, 1);
        assert_eq!(summary.name, "Kim");
        assert_eq!(summary.reserved_at, t0() + Duration::seconds(5));

        let seat = Database::get_seat(db.connection(), 1).unwrap().unwrap();
        assert_eq!(seat.status(), SeatStatus::Reserved);
        assert_eq!(seat.reserved_at(), Some(summary.reserved_at));
        assert_eq!(Database::list_reservations(db.connection()).unwrap().len(), 1);
    }

    #[test]
    fn test_commit_validates_before_store_access() {
        let (_clock, service) = service();
        let mut db = create_seeded_database(&["A1"]);

        // Unknown seat, but the payload is checked first.
        let err = service
            .commit(&mut db, 99, "tok1", &CommitRequest::new(" ", "010"))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "name"));

        let err = service
            .commit(&mut db, 1, "tok1", &CommitRequest::new("Kim", "01"))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "phone"));
    }

    #[test]
    fn test_commit_without_hold() {
        let (_clock, service) = service();
        let mut db = create_seeded_database(&["A1"]);
        assert!(matches!(
            service.commit(&mut db, 1, "tok1", &kim()),
            Err(Error::NotHeldByClient { seat_id: 1 })
        ));
    }

    #[test]
    fn test_commit_by_other_token() {
        let (_clock, service) = service();
        let mut db = create_seeded_database(&["A1"]);
        service.hold(&mut db, 1, "tok1").unwrap();
        assert!(matches!(
            service.commit(&mut db, 1, "tok2", &kim()),
            Err(Error::NotHeldByClient { seat_id: 1 })
        ));
    }

    #[test]
    fn test_commit_after_expiry() {
        let (clock, service) = service();
        let mut db = create_seeded_database(&["A1"]);
        service.hold(&mut db, 1, "tok1").unwrap();
        clock.advance(Duration::seconds(91));
        assert!(matches!(
            service.commit(&mut db, 1, "tok1", &kim()),
            Err(Error::HoldExpired { seat_id: 1 })
        ));
    }

    #[test]
    fn test_recommit_returns_stored_summary() {
        let (clock, service) = service();
        let mut db = create_seeded_database(&["A1"]);
        service.hold(&mut db, 1, "tok1").unwrap();
        let first = service.commit(&mut db, 1, "tok1", &kim()).unwrap();

        let sub = service.notifier().subscribe(None);
        clock.advance(Duration::seconds(30));
        let second = service.commit(&mut db, 1, "tok1", &kim()).unwrap();

        assert_eq!(first, second);
        assert_eq!(Database::list_reservations(db.connection()).unwrap().len(), 1);
        assert!(sub.try_recv().is_err());
    }

    #[test]
    fn test_commit_reserved_seat_by_other_token() {
        let (_clock, service) = service();
        let mut db = create_seeded_database(&["A1"]);
        service.hold(&mut db, 1, "tok1").unwrap();
        service.commit(&mut db, 1, "tok1", &kim()).unwrap();

        assert!(matches!(
            service.commit(&mut db, 1, "tok2", &kim()),
            Err(Error::AlreadyReserved { seat_id: 1 })
        ));
    }

    #[test]
    fn test_injected_failure_releases_seat() {
        let (_clock, service) = service();
        let service = service.with_failure_injector(Arc::new(FixedFailure::always()));
        let mut db = create_seeded_database(&["A1"]);
        service.hold(&mut db, 1, "tok1").unwrap();

        let sub = service.notifier().subscribe(None);
        let err = service.commit(&mut db, 1, "tok1", &kim()).unwrap_err();
        assert!(matches!(err, Error::IntentionalFailure { seat_id: 1 }));
        assert!(err.is_retryable());

        let seat = Database::get_seat(db.connection(), 1).unwrap().unwrap();
        assert_eq!(seat.status(), SeatStatus::Available);
        assert!(seat.hold_token().is_none());
        assert!(Database::list_reservations(db.connection()).unwrap().is_empty());

        match sub.try_recv().unwrap() {
            SeatEvent::SeatUpdate(seat) => assert_eq!(seat.status(), SeatStatus::Available),
            SeatEvent::Ping => panic!("unexpected ping"),
        }
    }

    #[test]
    fn test_existing_ledger_row_is_reused() {
        let (clock, service) = service();
        let mut db = create_seeded_database(&["A1"]);
        service.hold(&mut db, 1, "tok1").unwrap();

        // A ledger row left behind while the seat is still held.
        let contact = ContactDetails::new("Lee", "010-1111-2222").unwrap();
        let orphan = Reservation::builder(1, "tok1", contact, t0()).build();
        Database::save_reservation(db.connection(), &orphan).unwrap();

        clock.advance(Duration::seconds(10));
        let summary = service.commit(&mut db, 1, "tok1", &kim()).unwrap();
        assert_eq!(summary, orphan.summary());

        let seat = Database::get_seat(db.connection(), 1).unwrap().unwrap();
        assert_eq!(seat.status(), SeatStatus::Reserved);
        assert_eq!(Database::list_reservations(db.connection()).unwrap().len(), 1);
    }
}
