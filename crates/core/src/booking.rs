//! Booking entity, status, and the rules that decide whether a reservation
//! may be persisted.
//!
//! [`BookingValidator`] is stateless apart from its clock and is shared by the
//! create and update flows. It never touches storage: callers load the room's
//! existing bookings, hand them in, and persist whatever comes back.
//!
//! Intervals are half-open, `[start, end)`. Two bookings on the same room
//! conflict iff `a.start < b.end && b.start < a.end` and neither is
//! `Cancelled`; a booking ending exactly when another starts is fine.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::types::{DbId, Timestamp};

/// Maximum length of the free-text purpose field (characters).
pub const MAX_PURPOSE_LENGTH: usize = 500;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_CONFIRMED: &str = "Confirmed";
pub const STATUS_CANCELLED: &str = "Cancelled";

/// All valid booking statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_CONFIRMED, STATUS_CANCELLED];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => STATUS_PENDING,
            BookingStatus::Confirmed => STATUS_CONFIRMED,
            BookingStatus::Cancelled => STATUS_CANCELLED,
        }
    }

    /// Anything but `Cancelled` occupies its slot.
    pub fn is_active(self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid booking status '{}'. Must be one of: {}", .0, VALID_STATUSES.join(", "))]
pub struct UnknownBookingStatus(pub String);

impl FromStr for BookingStatus {
    type Err = UnknownBookingStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(BookingStatus::Pending),
            STATUS_CONFIRMED => Ok(BookingStatus::Confirmed),
            STATUS_CANCELLED => Ok(BookingStatus::Cancelled),
            other => Err(UnknownBookingStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for BookingStatus {
    type Error = UnknownBookingStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Time slots
// ---------------------------------------------------------------------------

/// A non-empty half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    start: Timestamp,
    end: Timestamp,
}

impl TimeSlot {
    /// Fails with [`BookingError::InvalidTimeRange`] unless `start < end`.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, BookingError> {
        if start >= end {
            return Err(BookingError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A persisted reservation of one room by one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub room_id: DbId,
    pub user_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub purpose: Option<String>,
    pub status: BookingStatus,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

impl Booking {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// The `[start_time, end_time)` window this booking occupies.
    pub fn slot(&self) -> TimeSlot {
        TimeSlot {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// A booking that passed validation and is ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub room_id: DbId,
    pub user_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub purpose: Option<String>,
    pub status: BookingStatus,
    pub created_at: Timestamp,
}

/// Partial update. `None` leaves the field untouched.
///
/// `purpose` cannot be cleared through a patch, only replaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingPatch {
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub purpose: Option<String>,
    pub status: Option<BookingStatus>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a booking operation was refused.
///
/// Every variant except the not-found pair and `Forbidden` is user-correctable
/// and deterministic for a given input and repository state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("End time must be after start time")]
    InvalidTimeRange { start: Timestamp, end: Timestamp },

    #[error("Cannot book in the past")]
    PastBooking { start: Timestamp, now: Timestamp },

    #[error("Purpose must be at most 500 characters (got {length})")]
    PurposeTooLong { length: usize },

    #[error("Room is already booked for this time slot")]
    SlotConflict { conflicting_booking_id: Option<DbId> },

    #[error("Room {0} not found")]
    RoomNotFound(DbId),

    #[error("Booking {0} not found")]
    BookingNotFound(DbId),

    #[error("Not allowed to access this booking")]
    Forbidden,
}

// ---------------------------------------------------------------------------
// Conflict detection
// ---------------------------------------------------------------------------

/// First active booking in `existing` on `room_id` whose interval overlaps
/// `slot`, skipping the booking with id `ignore` (the one being edited).
pub fn find_conflict<'a>(
    room_id: DbId,
    slot: &TimeSlot,
    existing: &'a [Booking],
    ignore: Option<DbId>,
) -> Option<&'a Booking> {
    existing.iter().find(|b| {
        b.room_id == room_id && b.is_active() && Some(b.id) != ignore && b.slot().overlaps(slot)
    })
}

fn validate_purpose(purpose: Option<&str>) -> Result<(), BookingError> {
    match purpose.map(|p| p.chars().count()) {
        Some(length) if length > MAX_PURPOSE_LENGTH => {
            Err(BookingError::PurposeTooLong { length })
        }
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// Decides whether a new or edited booking may be persisted.
#[derive(Clone)]
pub struct BookingValidator {
    clock: Arc<dyn Clock>,
}

impl BookingValidator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Validate a prospective booking against the room's existing bookings.
    ///
    /// The room itself must already be known to exist. Checks run in this
    /// order and the first failure wins:
    ///
    /// 1. `start < end`, else [`BookingError::InvalidTimeRange`]
    /// 2. `start >= now`, else [`BookingError::PastBooking`]
    /// 3. purpose length, else [`BookingError::PurposeTooLong`]
    /// 4. no overlap with an active booking, else [`BookingError::SlotConflict`]
    ///
    /// On success the returned [`NewBooking`] is `Confirmed`, owned by
    /// `requester_id` and stamped with the current instant.
    pub fn validate_new_booking(
        &self,
        room_id: DbId,
        requester_id: DbId,
        start: Timestamp,
        end: Timestamp,
        purpose: Option<String>,
        existing: &[Booking],
    ) -> Result<NewBooking, BookingError> {
        let slot = TimeSlot::new(start, end)?;

        let now = self.clock.now();
        if slot.start() < now {
            return Err(BookingError::PastBooking { start, now });
        }

        validate_purpose(purpose.as_deref())?;

        if let Some(conflict) = find_conflict(room_id, &slot, existing, None) {
            return Err(BookingError::SlotConflict {
                conflicting_booking_id: Some(conflict.id),
            });
        }

        Ok(NewBooking {
            room_id,
            user_id: requester_id,
            start_time: start,
            end_time: end,
            purpose,
            status: BookingStatus::Confirmed,
            created_at: now,
        })
    }

    /// Apply `patch` to `booking` and re-validate the result.
    ///
    /// - ordering is always re-checked;
    /// - the past-start rule only applies when `start_time` is actually moved,
    ///   so an in-progress booking can still have its purpose or status edited;
    /// - conflicts against `existing` (the booking itself excluded) are
    ///   re-checked whenever the result is active and either its window moved
    ///   or it was reactivated from `Cancelled`.
    ///
    /// `updated_at` is set to now on success.
    pub fn apply_partial_update(
        &self,
        booking: &Booking,
        patch: &BookingPatch,
        existing: &[Booking],
    ) -> Result<Booking, BookingError> {
        let mut updated = booking.clone();

        if let Some(start) = patch.start_time {
            updated.start_time = start;
        }
        if let Some(end) = patch.end_time {
            updated.end_time = end;
        }
        if let Some(purpose) = &patch.purpose {
            updated.purpose = Some(purpose.clone());
        }
        if let Some(status) = patch.status {
            updated.status = status;
        }

        let slot = TimeSlot::new(updated.start_time, updated.end_time)?;

        let now = self.clock.now();
        if updated.start_time != booking.start_time && slot.start() < now {
            return Err(BookingError::PastBooking {
                start: updated.start_time,
                now,
            });
        }

        validate_purpose(updated.purpose.as_deref())?;

        let window_moved =
            updated.start_time != booking.start_time || updated.end_time != booking.end_time;
        let reactivated = !booking.is_active() && updated.is_active();

        if updated.is_active() && (window_moved || reactivated) {
            if let Some(conflict) =
                find_conflict(updated.room_id, &slot, existing, Some(updated.id))
            {
                return Err(BookingError::SlotConflict {
                    conflicting_booking_id: Some(conflict.id),
                });
            }
        }

        updated.updated_at = Some(now);
        Ok(updated)
    }
}

impl fmt::Debug for BookingValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingValidator").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
