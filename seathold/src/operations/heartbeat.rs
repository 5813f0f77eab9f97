//! Renewing a hold.

use std::cmp;

use crate::database::{commit, Database};
use crate::error::{Error, Result};
use crate::seat::{validate_token, SeatStatus, SeatView};

use super::{load_seat, SeatService};

impl SeatService {
    /// Extends `token`'s hold on a seat by the heartbeat interval.
    ///
    /// The new expiry is measured from the later of the current expiry and
    /// now, so a renewal never shortens the time left on the hold.
    ///
    /// # Errors
    ///
    /// - [`Error::SeatNotFound`] for an unknown seat
    /// - [`Error::AlreadyReserved`] if the seat is committed
    /// - [`Error::NotHeldByClient`] if `token` does not hold the seat
    /// - [`Error::HoldExpired`] if the hold has already lapsed
    pub fn heartbeat(&self, db: &mut Database, seat_id: i64, token: &str) -> Result<SeatView> {
        validate_token(token)?;
        let now = self.now();
        let busy_millis = db.busy_timeout_millis();
        let tx = db.begin_transaction()?;

        let mut seat = load_seat(&tx, seat_id)?;
        if seat.status() == SeatStatus::Reserved {
            return Err(Error::AlreadyReserved { seat_id });
        }
        if !seat.is_held_by(token) {
            return Err(Error::NotHeldByClient { seat_id });
        }
        let Some(current) = seat.hold_expires_at().filter(|&at| at > now) else {
            return Err(Error::HoldExpired { seat_id });
        };

        let expires_at = cmp::max(current, now) + self.policy.heartbeat_extend;
        seat.extend_hold(expires_at, now);
        Database::update_seat(&tx, &seat)?;
        commit(tx, busy_millis)?;

        log::debug!("seat {seat_id} hold extended to {}", expires_at.to_rfc3339());
        self.publish(&seat);
        Ok(seat.view_for(Some(token), now))
    }
}
