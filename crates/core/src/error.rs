//! Generic domain error shared by every layer above `core`.
//!
//! Booking-specific failures have their own richer type,
//! [`crate::booking::BookingError`]; everything else (room rules, user
//! management, authentication) reports through [`CoreError`].

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A referenced room, user or booking does not exist.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// User-correctable input problem (field length, range, unknown enum value).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Uniqueness clash, e.g. a username or email that is already registered.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing, malformed or expired credential.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the actor's role does not permit the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
