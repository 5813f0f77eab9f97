//! Reservation records for committed seats.
//!
//! This module provides the ledger record created by a successful commit,
//! the validated contact payload a commit carries, and the summary returned
//! to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bounds on the contact fields, in characters.
pub const NAME_MIN_LEN: usize = 1;
/// Maximum name length.
pub const NAME_MAX_LEN: usize = 50;
/// Minimum phone length.
pub const PHONE_MIN_LEN: usize = 3;
/// Maximum phone length.
pub const PHONE_MAX_LEN: usize = 20;

/// A field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for crate::Error {
    fn from(err: ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

/// Contact details supplied with a commit.
///
/// Both fields are trimmed and must be non-blank; `name` is 1-50 characters
/// and `phone` is 3-20 characters.
///
/// # Examples
///
/// ```
/// use seathold::ContactDetails;
///
/// let contact = ContactDetails::new("Kim", "010-0000-0000").unwrap();
/// assert_eq!(contact.name(), "Kim");
///
/// assert!(ContactDetails::new("   ", "010-0000-0000").is_err());
/// assert!(ContactDetails::new("Kim", "01").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    name: String,
    phone: String,
}

impl ContactDetails {
    /// Validates and builds contact details.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] naming the first offending field.
    pub fn new(name: impl AsRef<str>, phone: impl AsRef<str>) -> Result<Self, ValidationError> {
        let name = check_field("name", name.as_ref(), NAME_MIN_LEN, NAME_MAX_LEN)?;
        let phone = check_field("phone", phone.as_ref(), PHONE_MIN_LEN, PHONE_MAX_LEN)?;
        Ok(Self { name, phone })
    }

    /// Returns the contact name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the contact phone.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }
}

fn check_field(field: &str, value: &str, min: usize, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError {
            field: field.into(),
            message: "must not be blank".into(),
        });
    }

    let len = trimmed.chars().count();
    if len < min || len > max {
        return Err(ValidationError {
            field: field.into(),
            message: format!("size must be between {min} and {max}"),
        });
    }

    Ok(trimmed.to_string())
}

/// An immutable commitment record in the ledger.
///
/// At most one exists per seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    id: Uuid,
    seat_id: i64,
    client_token: String,
    name: String,
    phone: String,
    reserved_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl Reservation {
    /// Creates a new reservation builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use seathold::{ContactDetails, Reservation};
    ///
    /// let contact = ContactDetails::new("Kim", "010-0000-0000").unwrap();
    /// let reservation = Reservation::builder(1, "tok1", contact, Utc::now()).build();
    /// assert_eq!(reservation.seat_id(), 1);
    /// ```
    #[must_use]
    pub fn builder(
        seat_id: i64,
        client_token: impl Into<String>,
        contact: ContactDetails,
        reserved_at: DateTime<Utc>,
    ) -> ReservationBuilder {
        ReservationBuilder {
            seat_id,
            client_token: client_token.into(),
            contact,
            reserved_at,
            id: None,
            created_at: None,
        }
    }

    /// Returns the globally unique reservation id.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the committed seat.
    #[must_use]
    pub const fn seat_id(&self) -> i64 {
        self.seat_id
    }

    /// Returns the token that held the seat when it was committed.
    #[must_use]
    pub fn client_token(&self) -> &str {
        &self.client_token
    }

    /// Returns the contact name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the contact phone.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Returns the commit instant.
    #[must_use]
    pub const fn reserved_at(&self) -> DateTime<Utc> {
        self.reserved_at
    }

    /// Returns when the ledger row was written.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Summarizes the reservation for the caller.
    #[must_use]
    pub fn summary(&self) -> ReservationSummary {
        ReservationSummary {
            seat_id: self.seat_id,
            name: self.name.clone(),
            reserved_at: self.reserved_at,
        }
    }
}

/// Builder for [`Reservation`].
#[derive(Debug)]
pub struct ReservationBuilder {
    seat_id: i64,
    client_token: String,
    contact: ContactDetails,
    reserved_at: DateTime<Utc>,
    id: Option<Uuid>,
    created_at: Option<DateTime<Utc>>,
}

impl ReservationBuilder {
    /// Sets an explicit id (used when loading from the ledger).
    #[must_use]
    pub const fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the creation timestamp. Defaults to `reserved_at`.
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Builds the reservation, generating a fresh v4 id if none was set.
    #[must_use]
    pub fn build(self) -> Reservation {
        Reservation {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            seat_id: self.seat_id,
            client_token: self.client_token,
            name: self.contact.name,
            phone: self.contact.phone,
            reserved_at: self.reserved_at,
            created_at: self.created_at.unwrap_or(self.reserved_at),
        }
    }
}

/// What a successful commit returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationSummary {
    /// The committed seat.
    pub seat_id: i64,
    /// Contact name on the reservation.
    pub name: String,
    /// Commit instant.
    pub reserved_at: DateTime<Utc>,
}
