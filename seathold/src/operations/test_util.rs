//! Shared fixtures for service unit tests.

use std::sync::Arc;

use crate::clock::ManualClock;
use crate::config::StreamOptions;
use crate::database::test_util::t0;
use crate::notifier::Notifier;

use super::{FixedFailure, SeatService};

/// A clock at `t0` and a service on it that never injects failures.
pub fn service() -> (Arc<ManualClock>, SeatService) {
    let clock = Arc::new(ManualClock::new(t0()));
    let notifier = Arc::new(Notifier::new(clock.clone(), StreamOptions::default()));
    let service = SeatService::new(clock.clone(), notifier)
        .with_failure_injector(Arc::new(FixedFailure::never()));
    (clock, service)
}
