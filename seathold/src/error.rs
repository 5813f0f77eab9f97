//! Error types for the seathold library.
//!
//! This module provides the error hierarchy for every seat operation,
//! using `thiserror` for ergonomic error handling, plus the boundary
//! translation into a structured `{code, message}` response.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::seat::SeatStatus;

/// Result type alias for operations that may fail with a seathold error.
///
/// # Examples
///
/// ```
/// use seathold::{Error, Result};
///
/// fn example_operation() -> Result<i64> {
///     Ok(1)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the seathold library.
///
/// Domain failures (not found, the conflict family, validation) are expected
/// outcomes of contended access and are meant to be surfaced to the caller.
/// The remaining variants are infrastructure or internal faults.
#[derive(Debug, Error)]
pub enum Error {
    /// The seat id is unknown.
    #[error("Seat({seat_id}) not found")]
    SeatNotFound {
        /// The seat that was looked up.
        seat_id: i64,
    },

    /// The seat has already been committed.
    #[error("Seat({seat_id}) is already reserved.")]
    AlreadyReserved {
        /// The reserved seat.
        seat_id: i64,
    },

    /// The seat is under a live hold owned by another token.
    #[error("Seat({seat_id}) is held by another client.")]
    HeldByOthers {
        /// The held seat.
        seat_id: i64,
    },

    /// The caller's hold has passed its expiry instant.
    #[error("Hold for seat({seat_id}) has expired.")]
    HoldExpired {
        /// The seat whose hold expired.
        seat_id: i64,
    },

    /// The seat is not held, or is held under a different token.
    #[error("Seat({seat_id}) is not held by this client.")]
    NotHeldByClient {
        /// The seat in question.
        seat_id: i64,
    },

    /// The commit was aborted by the failure-injection hook.
    #[error("Reservation failed due to simulated failure. Please try again.")]
    IntentionalFailure {
        /// The seat that was reverted to available.
        seat_id: i64,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A state that correct atomic semantics rule out was observed.
    #[error("unreachable state for seat({seat_id}): {details}")]
    UnreachableState {
        /// The seat being operated on.
        seat_id: i64,
        /// The status observed when the fault was detected.
        observed: Option<SeatStatus>,
        /// Details about the fault.
        details: String,
    },

    /// The ledger already holds a reservation for this seat.
    #[error("reservation for seat({seat_id}) already exists")]
    UniqueConstraintViolation {
        /// The seat that already has a reservation.
        seat_id: i64,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A database lock timeout occurred.
    #[error("database lock timeout after {millis}ms")]
    LockTimeout {
        /// The number of milliseconds waited before timing out.
        millis: u64,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: u32,
        /// The schema version found in the database.
        found: u32,
    },
}

/// Coarse failure class used at the boundary.
///
/// Mirrors the not-found / conflict / bad-request / internal split that a
/// transport layer maps onto its own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The addressed seat does not exist.
    NotFound,
    /// The seat's current state forbids the operation; retryable for some codes.
    Conflict,
    /// Malformed input.
    BadRequest,
    /// Unexpected failure; details are logged, never exposed.
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Conflict => write!(f, "conflict"),
            Self::BadRequest => write!(f, "bad request"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Stable error codes carried in [`ErrorResponse::code`].
pub mod codes {
    /// Malformed input.
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    /// Unknown seat.
    pub const NOT_FOUND: &str = "NOT_FOUND";
    /// Live hold owned by someone else.
    pub const SEAT_HELD_BY_OTHERS: &str = "SEAT_HELD_BY_OTHERS";
    /// Seat already committed.
    pub const SEAT_ALREADY_RESERVED: &str = "SEAT_ALREADY_RESERVED";
    /// Caller's hold expired.
    pub const HOLD_EXPIRED: &str = "HOLD_EXPIRED";
    /// Caller does not own the hold.
    pub const NOT_HELD_BY_CLIENT: &str = "NOT_HELD_BY_CLIENT";
    /// Simulated commit failure.
    pub const INTENTIONAL_FAILURE: &str = "INTENTIONAL_FAILURE";
    /// Anything else.
    pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
}

impl Error {
    /// Returns the boundary failure class for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use seathold::error::{Error, ErrorKind};
    ///
    /// let err = Error::HeldByOthers { seat_id: 1 };
    /// assert_eq!(err.kind(), ErrorKind::Conflict);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SeatNotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyReserved { .. }
            | Self::HeldByOthers { .. }
            | Self::HoldExpired { .. }
            | Self::NotHeldByClient { .. }
            | Self::IntentionalFailure { .. } => ErrorKind::Conflict,
            Self::Validation { .. } => ErrorKind::BadRequest,
            _ => ErrorKind::Internal,
        }
    }

    /// Returns the stable wire code for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use seathold::Error;
    ///
    /// let err = Error::AlreadyReserved { seat_id: 3 };
    /// assert_eq!(err.code(), "SEAT_ALREADY_RESERVED");
    /// ```
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::SeatNotFound { .. } => codes::NOT_FOUND,
            Self::AlreadyReserved { .. } => codes::SEAT_ALREADY_RESERVED,
            Self::HeldByOthers { .. } => codes::SEAT_HELD_BY_OTHERS,
            Self::HoldExpired { .. } => codes::HOLD_EXPIRED,
            Self::NotHeldByClient { .. } => codes::NOT_HELD_BY_CLIENT,
            Self::IntentionalFailure { .. } => codes::INTENTIONAL_FAILURE,
            Self::Validation { .. } => codes::BAD_REQUEST,
            _ => codes::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller may retry after this error and expect a different outcome.
    ///
    /// Injected commit failures and lost hold races leave the seat in a
    /// retryable state.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::IntentionalFailure { .. } | Self::HeldByOthers { .. } | Self::LockTimeout { .. }
        )
    }

    /// Check if error indicates an unknown seat.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SeatNotFound { .. })
    }

    /// Builds a validation error for `field`.
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Structured failure body handed to the transport layer.
///
/// # Examples
///
/// ```
/// use seathold::{Error, ErrorResponse};
///
/// let body = ErrorResponse::from(&Error::HoldExpired { seat_id: 2 });
/// assert_eq!(body.code, "HOLD_EXPIRED");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        let message = match err.kind() {
            ErrorKind::Internal => {
                log::error!("internal failure: {err:?}");
                "Unexpected error".to_string()
            }
            ErrorKind::BadRequest => match err {
                Error::Validation { field, message } => format!("{field}: {message}"),
                other => other.to_string(),
            },
            _ => err.to_string(),
        };

        Self {
            code: err.code().to_string(),
            message,
        }
    }
}

/// Maps a rusqlite error, turning busy/locked failures into [`Error::LockTimeout`].
pub(crate) fn map_busy(err: rusqlite::Error, busy_timeout_millis: u64) -> Error {
    if let rusqlite::Error::SqliteFailure(ref sqlite_err, _) = err {
        if matches!(
            sqlite_err.code,
            rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
        ) {
            return Error::LockTimeout {
                millis: busy_timeout_millis,
            };
        }
    }
    Error::Database(err)
}
