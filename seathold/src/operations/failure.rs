//! Commit failure injection.
//!
//! A commit consults a [`FailureInjector`] after its checks pass. A `true`
//! answer aborts the commit and returns the seat to `AVAILABLE`, modelling
//! a downstream failure the client is expected to retry.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Decides whether the next commit fails.
pub trait FailureInjector: Send + Sync {
    /// Returns `true` to abort the commit in progress.
    fn should_fail(&self) -> bool;
}

/// Fails each commit independently with a fixed probability.
///
/// # Examples
///
/// ```
/// use seathold::operations::{FailureInjector, RandomFailure};
///
/// assert!(!RandomFailure::new(0.0).should_fail());
/// assert!(RandomFailure::new(1.0).should_fail());
/// ```
#[derive(Debug)]
pub struct RandomFailure {
    rate: f64,
    seeded: Option<Mutex<StdRng>>,
}

impl RandomFailure {
    /// Uses the thread-local generator. `rate` is clamped to `[0, 1]`.
    #[must_use]
    pub fn new(rate: f64) -> Self {
        Self {
            rate: clamp_rate(rate),
            seeded: None,
        }
    }

    /// Uses a generator seeded with `seed`, for reproducible runs.
    #[must_use]
    pub fn seeded(rate: f64, seed: u64) -> Self {
        Self {
            rate: clamp_rate(rate),
            seeded: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    /// Returns the effective failure probability.
    #[must_use]
    pub const fn rate(&self) -> f64 {
        self.rate
    }
}

fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}

impl FailureInjector for RandomFailure {
    fn should_fail(&self) -> bool {
        match &self.seeded {
            Some(rng) => rng.lock().gen_bool(self.rate),
            None => rand::thread_rng().gen_bool(self.rate),
        }
    }
}

/// Always gives the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedFailure(bool);

impl FixedFailure {
    /// Never fails.
    #[must_use]
    pub const fn never() -> Self {
        Self(false)
    }

    /// Always fails.
    #[must_use]
    pub const fn always() -> Self {
        Self(true)
    }
}

impl FailureInjector for FixedFailure {
    fn should_fail(&self) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_is_clamped() {
        assert!((RandomFailure::new(2.0).rate() - 1.0).abs() < f64::EPSILON);
        assert!(RandomFailure::new(-1.0).rate().abs() < f64::EPSILON);
        assert!(RandomFailure::new(f64::NAN).rate().abs() < f64::EPSILON);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let a = RandomFailure::seeded(0.5, 7);
        let b = RandomFailure::seeded(0.5, 7);
        let run = |f: &RandomFailure| (0..32).map(|_| f.should_fail()).collect::<Vec<_>>();
        assert_eq!(run(&a), run(&b));
    }

    #[test]
    fn test_fixed() {
        assert!(!FixedFailure::never().should_fail());
        assert!(FixedFailure::always().should_fail());
    }
}
