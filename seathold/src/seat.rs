//! Seat records, status, and the per-viewer seat view.
//!
//! A [`Seat`] is the stored row. The pure transition helpers on it are the
//! only way the state machine mutates a loaded seat before persisting it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Lifecycle status of a seat.
///
/// `Available` is initial, `Held` is transient and TTL-bounded, and
/// `Reserved` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    /// Free to be held.
    Available,
    /// Claimed by a client token until `hold_expires_at`.
    Held,
    /// Committed; no further transitions.
    Reserved,
}

impl SeatStatus {
    /// The stored and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Held => "HELD",
            Self::Reserved => "RESERVED",
        }
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeatStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(Self::Available),
            "HELD" => Ok(Self::Held),
            "RESERVED" => Ok(Self::Reserved),
            other => Err(Error::DatabaseCorruption {
                details: format!("unknown seat status '{other}'"),
            }),
        }
    }
}

/// A uniquely labeled seat as stored.
///
/// Invariant: `status == Held` iff `hold_token` is set. `hold_expires_at`
/// accompanies the token; a missing expiry is treated as already expired.
///
/// Not serializable: the hold token stays server-side, and clients only
/// ever see a [`SeatView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    id: i64,
    label: String,
    status: SeatStatus,
    hold_token: Option<String>,
    hold_expires_at: Option<DateTime<Utc>>,
    reserved_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Seat {
    /// Reassembles a seat from stored columns.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub(crate) fn from_parts(
        id: i64,
        label: String,
        status: SeatStatus,
        hold_token: Option<String>,
        hold_expires_at: Option<DateTime<Utc>>,
        reserved_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            label,
            status,
            hold_token,
            hold_expires_at,
            reserved_at,
            created_at,
            updated_at,
        }
    }

    /// Returns the stable seat id.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Returns the display label, e.g. `A1`.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> SeatStatus {
        self.status
    }

    /// Returns the token of the current holder, if held.
    #[must_use]
    pub fn hold_token(&self) -> Option<&str> {
        self.hold_token.as_deref()
    }

    /// Returns when the current hold lapses, if held.
    #[must_use]
    pub const fn hold_expires_at(&self) -> Option<DateTime<Utc>> {
        self.hold_expires_at
    }

    /// Returns when the seat was committed, if ever.
    #[must_use]
    pub const fn reserved_at(&self) -> Option<DateTime<Utc>> {
        self.reserved_at
    }

    /// Returns when the row was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the row was last mutated.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the hold has lapsed at `now`. A missing expiry counts as lapsed.
    #[must_use]
    pub fn hold_expired(&self, now: DateTime<Utc>) -> bool {
        self.hold_expires_at.map_or(true, |expires| expires <= now)
    }

    /// Whether the seat is `Held` under a hold that is still running at `now`.
    #[must_use]
    pub fn is_live_hold(&self, now: DateTime<Utc>) -> bool {
        self.status == SeatStatus::Held && !self.hold_expired(now)
    }

    /// Whether `token` owns the seat's hold.
    #[must_use]
    pub fn is_held_by(&self, token: &str) -> bool {
        self.status == SeatStatus::Held && self.hold_token.as_deref() == Some(token)
    }

    /// Moves the hold expiry to `expires_at`.
    pub(crate) fn extend_hold(&mut self, expires_at: DateTime<Utc>, now: DateTime<Utc>) {
        self.hold_expires_at = Some(expires_at);
        self.updated_at = now;
    }

    /// Drops any hold and returns the seat to `Available`.
    pub(crate) fn release(&mut self, now: DateTime<Utc>) {
        self.status = SeatStatus::Available;
        self.hold_token = None;
        self.hold_expires_at = None;
        self.updated_at = now;
    }

    /// Commits the seat. `reserved_at` is only set the first time.
    ///
    /// The hold token and expiry are cleared, so `Held` remains the only
    /// status that carries a token.
    pub(crate) fn mark_reserved(&mut self, now: DateTime<Utc>) {
        self.status = SeatStatus::Reserved;
        self.hold_token = None;
        self.hold_expires_at = None;
        self.reserved_at.get_or_insert(now);
        self.updated_at = now;
    }

    /// Renders the seat for a viewer identified by `viewer_token`.
    #[must_use]
    pub fn view_for(&self, viewer_token: Option<&str>, now: DateTime<Utc>) -> SeatView {
        let held_by_me = viewer_token
            .is_some_and(|token| self.is_held_by(token) && !self.hold_expired(now));

        SeatView {
            id: self.id,
            label: self.label.clone(),
            status: self.status,
            hold_expires_at: self.hold_expires_at,
            held_by_me,
        }
    }
}

/// What a client sees of a seat.
///
/// `held_by_me` is true only for a live hold owned by the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatView {
    /// Seat id.
    pub id: i64,
    /// Display label.
    pub label: String,
    /// Current status.
    pub status: SeatStatus,
    /// Expiry of the current hold, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_expires_at: Option<DateTime<Utc>>,
    /// Whether the viewer owns a live hold on this seat.
    pub held_by_me: bool,
}

/// Maximum accepted client token length, matching the stored column bound.
pub const MAX_TOKEN_LEN: usize = 64;

/// Validates an opaque client token.
///
/// # Errors
///
/// Returns a validation error if the token is blank or longer than
/// [`MAX_TOKEN_LEN`] characters.
pub fn validate_token(token: &str) -> crate::Result<()> {
    if token.trim().is_empty() {
        return Err(Error::validation("clientToken", "must not be blank"));
    }
    if token.chars().count() > MAX_TOKEN_LEN {
        return Err(Error::validation(
            "clientToken",
            format!("must be at most {MAX_TOKEN_LEN} characters"),
        ));
    }
    Ok(())
}
