#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # seathold
//!
//! A library for contended seat holds: many clients race to hold a seat,
//! holds lapse after a TTL unless renewed, one holder commits the seat into
//! a reservation ledger, and every change fans out to live subscribers.
//!
//! ## Core Types
//!
//! - [`Seat`], [`SeatStatus`], and [`SeatView`]: Seat records and what a client sees
//! - [`Reservation`] and [`ContactDetails`]: Ledger records for committed seats
//! - [`SeatService`]: The hold/commit state machine
//! - [`Notifier`]: Change fan-out to subscribers
//! - [`Database`]: The SQLite-backed seat store and ledger
//! - [`Error`] and [`Result`]: Error handling types
//!
//! ## Examples
//!
//! ```
//! use std::sync::Arc;
//! use seathold::clock::SystemClock;
//! use seathold::config::StreamOptions;
//! use seathold::operations::{seed_default_seats, FixedFailure};
//! use seathold::{Database, DatabaseConfig, Notifier, SeatService, SeatStatus};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut db = Database::open(DatabaseConfig::new(dir.path().join("seats.db"))).unwrap();
//! seed_default_seats(&mut db, &Default::default(), chrono::Utc::now()).unwrap();
//!
//! let clock = Arc::new(SystemClock);
//! let notifier = Arc::new(Notifier::new(clock.clone(), StreamOptions::default()));
//! let service = SeatService::new(clock, notifier)
//!     .with_failure_injector(Arc::new(FixedFailure::never()));
//!
//! let view = service.hold(&mut db, 1, "tok1").unwrap();
//! assert_eq!(view.status, SeatStatus::Held);
//! assert!(view.held_by_me);
//! ```

pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod notifier;
pub mod operations;
pub mod reservation;
pub mod seat;

// Re-export key types at crate root for convenience
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, ErrorKind, ErrorResponse, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use notifier::{ChangeFeed, Notifier, SeatEvent, StreamMessage, Subscription};
pub use operations::{CommitRequest, FailureInjector, FixedFailure, RandomFailure, SeatService};
pub use reservation::{ContactDetails, Reservation, ReservationSummary};
pub use seat::{Seat, SeatStatus, SeatView};
