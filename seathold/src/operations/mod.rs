//! The hold/commit state machine.
//!
//! [`SeatService`] implements every seat operation against a caller-owned
//! [`Database`] connection. Each operation reads the clock once, runs in a
//! single IMMEDIATE transaction, and broadcasts the post-mutation seat only
//! after that transaction commits.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use seathold::clock::SystemClock;
//! use seathold::config::StreamOptions;
//! use seathold::notifier::Notifier;
//! use seathold::operations::{CommitRequest, FixedFailure, SeatService};
//! use seathold::{Database, DatabaseConfig};
//!
//! let clock = Arc::new(SystemClock);
//! let notifier = Arc::new(Notifier::new(clock.clone(), StreamOptions::default()));
//! let service = SeatService::new(clock, notifier)
//!     .with_failure_injector(Arc::new(FixedFailure::never()));
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/seathold.db")).unwrap();
//! service.hold(&mut db, 1, "tok1").unwrap();
//! let summary = service
//!     .commit(&mut db, 1, "tok1", &CommitRequest::new("Kim", "010-0000-0000"))
//!     .unwrap();
//! println!("reserved at {}", summary.reserved_at);
//! ```

pub mod commit;
pub mod failure;
pub mod heartbeat;
pub mod hold;
pub mod init;
pub mod list;

#[cfg(test)]
pub(crate) mod test_util;

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};

use crate::clock::Clock;
use crate::config::{Config, HoldPolicy};
use crate::database::Database;
use crate::notifier::{Notifier, SeatEvent};
use crate::seat::Seat;

pub use commit::CommitRequest;
pub use failure::{FailureInjector, FixedFailure, RandomFailure};
pub use init::{init_database, seed_default_seats, InitOptions, InitResult};

/// Seat operations over an injected clock, failure source, and notifier.
pub struct SeatService {
    clock: Arc<dyn Clock>,
    failure: Arc<dyn FailureInjector>,
    notifier: Arc<Notifier>,
    policy: HoldPolicy,
}

impl std::fmt::Debug for SeatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeatService")
            .field("notifier", &self.notifier)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl SeatService {
    /// Creates a service with the default hold policy and the default
    /// commit failure rate.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, notifier: Arc<Notifier>) -> Self {
        Self {
            clock,
            failure: Arc::new(RandomFailure::new(
                crate::config::schema::DEFAULT_FAILURE_RATE,
            )),
            notifier,
            policy: HoldPolicy::default(),
        }
    }

    /// Builds a service, and its notifier, from resolved configuration.
    #[must_use]
    pub fn from_config(config: &Config, clock: Arc<dyn Clock>) -> Self {
        let notifier = Arc::new(Notifier::new(
            Arc::clone(&clock),
            config.stream_options(),
        ));
        Self::new(clock, notifier)
            .with_failure_injector(Arc::new(RandomFailure::new(config.failure_rate())))
            .with_policy(config.hold_policy())
    }

    /// Replaces the commit failure source.
    #[must_use]
    pub fn with_failure_injector(mut self, failure: Arc<dyn FailureInjector>) -> Self {
        self.failure = failure;
        self
    }

    /// Replaces the hold timing.
    #[must_use]
    pub const fn with_policy(mut self, policy: HoldPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the notifier this service broadcasts through.
    #[must_use]
    pub const fn notifier(&self) -> &Arc<Notifier> {
        &self.notifier
    }

    /// Returns the hold timing.
    #[must_use]
    pub const fn policy(&self) -> HoldPolicy {
        self.policy
    }

    /// Reads the clock once for an operation, at the store's millisecond
    /// precision so returned views match what a later read sees.
    fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(3)
    }

    fn publish(&self, seat: &Seat) {
        let delivered = self.notifier.broadcast(&SeatEvent::SeatUpdate(seat.clone()));
        log::debug!(
            "broadcast seat {} ({}) to {delivered} subscribers",
            seat.id(),
            seat.status()
        );
    }
}

/// Loads a seat or fails with not-found.
fn load_seat(conn: &rusqlite::Connection, seat_id: i64) -> crate::Result<Seat> {
    Database::get_seat(conn, seat_id)?.ok_or(crate::Error::SeatNotFound { seat_id })
}
