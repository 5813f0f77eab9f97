//! Reading seats and opening update streams.

use crate::database::Database;
use crate::error::{Error, Result};
use crate::notifier::{SeatEvent, Subscription};
use crate::seat::SeatView;

use super::SeatService;

impl SeatService {
    /// Lists every seat in id order as seen by `viewer_token`.
    ///
    /// Takes no lock, so a concurrent writer may make the result stale.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_seats(&self, db: &Database, viewer_token: Option<&str>) -> Result<Vec<SeatView>> {
        let now = self.now();
        let seats = Database::get_all_seats(db.connection())?;
        Ok(seats
            .iter()
            .map(|seat| seat.view_for(viewer_token, now))
            .collect())
    }

    /// Opens a stream of seat updates for `viewer_token`.
    ///
    /// The subscription starts with one update per seat and a ping. The
    /// store is read while the notifier's registry is locked, and writers
    /// broadcast only after they commit, so any change the snapshot missed
    /// arrives after it and the last event per seat is never stale.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read. Nothing is
    /// subscribed in that case.
    pub fn subscribe_updates(
        &self,
        db: &Database,
        viewer_token: Option<String>,
    ) -> Result<Subscription> {
        let subscription = self.notifier.subscribe_primed(viewer_token, || {
            let mut events: Vec<SeatEvent> = Database::get_all_seats(db.connection())?
                .into_iter()
                .map(SeatEvent::SeatUpdate)
                .collect();
            events.push(SeatEvent::Ping);
            Ok::<_, Error>(events)
        })?;

        log::debug!("subscriber {} primed with snapshot", subscription.id());
        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::create_seeded_database;
    use crate::notifier::{StreamMessage, TryRecvError};
    use crate::operations::test_util::service;
    use crate::seat::SeatStatus;

    #[test]
    fn test_list_seats_in_id_order() {
        let (_clock, service) = service();
        let db = create_seeded_database(&["A1", "A2", "B1"]);

        let labels: Vec<_> = service
            .list_seats(&db, None)
            .unwrap()
            .into_iter()
            .map(|view| view.label)
            .collect();
        assert_eq!(labels, ["A1", "A2", "B1"]);
    }

    #[test]
    fn test_list_marks_viewer_holds() {
        let (_clock, service) = service();
        let mut db = create_seeded_database(&["A1", "A2"]);
        service.hold(&mut db, 2, "tok1").unwrap();

        let mine = service.list_seats(&db, Some("tok1")).unwrap();
        assert!(!mine[0].held_by_me);
        assert!(mine[1].held_by_me);

        let theirs = service.list_seats(&db, Some("tok2")).unwrap();
        assert_eq!(theirs[1].status, SeatStatus::Held);
        assert!(!theirs[1].held_by_me);
    }

    #[test]
    fn test_subscribe_starts_with_snapshot_then_ping() {
        let (_clock, service) = service();
        let mut db = create_seeded_database(&["A1", "A2"]);
        service.hold(&mut db, 1, "tok1").unwrap();

        let sub = service
            .subscribe_updates(&db, Some("tok1".into()))
            .unwrap();

        let first = sub.try_recv().unwrap();
        match sub.render(&first) {
            StreamMessage::SeatUpdate(view) => {
                assert_eq!(view.id, 1);
                assert!(view.held_by_me);
            }
            StreamMessage::Ping(_) => panic!("expected a seat update"),
        }
        assert!(matches!(sub.try_recv().unwrap(), SeatEvent::SeatUpdate(_)));
        assert!(matches!(sub.try_recv().unwrap(), SeatEvent::Ping));
        assert!(matches!(sub.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_subscription_sees_later_changes() {
        let (_clock, service) = service();
        let mut db = create_seeded_database(&["A1"]);
        let sub = service.subscribe_updates(&db, None).unwrap();
        while sub.try_recv().is_ok() {}

        service.hold(&mut db, 1, "tok1").unwrap();
        match sub.try_recv().unwrap() {
            SeatEvent::SeatUpdate(seat) => assert_eq!(seat.status(), SeatStatus::Held),
            SeatEvent::Ping => panic!("expected a seat update"),
        }
    }

    #[test]
    fn test_failed_snapshot_leaves_no_subscriber() {
        let (_clock, service) = service();
        let db = create_seeded_database(&["A1"]);
        db.connection().execute_batch("DROP TABLE reservations; DROP TABLE seats").unwrap();

        assert!(service.subscribe_updates(&db, None).is_err());
        assert_eq!(service.notifier().subscriber_count(), 0);
    }
}
