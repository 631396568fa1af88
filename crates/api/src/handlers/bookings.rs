//! Handlers for the `/bookings` resource.
//!
//! Create and update run validate-then-write inside one transaction that
//! holds a row lock on the room, so concurrent writers for the same room are
//! serialized. The `ex_bookings_room_slot` exclusion constraint backs this up
//! at the storage level.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use roombook_core::access::{authorize_booking_access, booking_list_scope};
use roombook_core::booking::{Booking, BookingError, BookingPatch, BookingStatus};
use roombook_core::error::CoreError;
use roombook_core::types::{DbId, Timestamp};
use roombook_db::models::booking::BookingDetails;
use roombook_db::repositories::{BookingRepo, RoomRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /bookings`.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub room_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub purpose: Option<String>,
}

/// Request body for `PUT /bookings/{id}`. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBookingRequest {
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub purpose: Option<String>,
    /// One of `Pending`, `Confirmed`, `Cancelled`.
    pub status: Option<String>,
}

impl TryFrom<UpdateBookingRequest> for BookingPatch {
    type Error = AppError;

    fn try_from(req: UpdateBookingRequest) -> Result<Self, Self::Error> {
        let status = req
            .status
            .map(|s| s.parse::<BookingStatus>())
            .transpose()
            .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
        Ok(BookingPatch {
            start_time: req.start_time,
            end_time: req.end_time,
            purpose: req.purpose,
            status,
        })
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/bookings
///
/// Admins see every booking; everyone else sees only their own.
pub async fn list_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<BookingDetails>>> {
    let scope = booking_list_scope(&auth.actor());
    let bookings = BookingRepo::list_with_details(&state.pool, scope).await?;
    Ok(Json(bookings))
}

/// GET /api/v1/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<BookingDetails>> {
    let details = BookingRepo::find_with_details(&state.pool, id)
        .await?
        .ok_or(BookingError::BookingNotFound(id))?;
    ensure_access(&auth, &details.booking)?;
    Ok(Json(details))
}

/// POST /api/v1/bookings
///
/// The caller becomes the owner; the booking is created `Confirmed`.
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<BookingDetails>)> {
    let mut tx = state.pool.begin().await?;

    if !RoomRepo::lock_for_update(&mut *tx, input.room_id).await? {
        return Err(BookingError::RoomNotFound(input.room_id).into());
    }

    let existing = BookingRepo::find_by_room(&mut *tx, input.room_id).await?;
    let new_booking = state
        .validator
        .validate_new_booking(
            input.room_id,
            auth.user_id,
            input.start_time,
            input.end_time,
            input.purpose,
            &existing,
        )
        .inspect_err(|e| {
            tracing::info!(
                room_id = input.room_id,
                user_id = auth.user_id,
                reason = %e,
                "Booking rejected"
            );
        })?;

    let booking = BookingRepo::create(&mut *tx, &new_booking).await?;
    tx.commit().await?;

    tracing::info!(
        booking_id = booking.id,
        room_id = booking.room_id,
        user_id = booking.user_id,
        start = %booking.start_time,
        end = %booking.end_time,
        "Booking created"
    );

    let details = load_details(&state, booking.id).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// PUT /api/v1/bookings/{id}
///
/// Partial update by the owner or an admin. The result is re-validated,
/// including against other bookings when the window moves or a cancelled
/// booking is reactivated.
pub async fn update_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBookingRequest>,
) -> AppResult<StatusCode> {
    let patch = BookingPatch::try_from(input)?;

    // Authorize before taking any lock.
    let current = BookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(BookingError::BookingNotFound(id))?;
    ensure_access(&auth, &current)?;

    let mut tx = state.pool.begin().await?;
    RoomRepo::lock_for_update(&mut *tx, current.room_id).await?;

    // Re-read under the lock; it may have changed or gone since.
    let current = BookingRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or(BookingError::BookingNotFound(id))?;
    let existing = BookingRepo::find_by_room(&mut *tx, current.room_id).await?;

    let updated = state
        .validator
        .apply_partial_update(&current, &patch, &existing)?;

    BookingRepo::update(&mut *tx, &updated)
        .await?
        .ok_or(BookingError::BookingNotFound(id))?;
    tx.commit().await?;

    tracing::info!(
        booking_id = id,
        user_id = auth.user_id,
        status = %updated.status,
        "Booking updated"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/bookings/{id}
pub async fn delete_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let booking = BookingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(BookingError::BookingNotFound(id))?;
    ensure_access(&auth, &booking)?;

    if !BookingRepo::delete(&state.pool, id).await? {
        return Err(BookingError::BookingNotFound(id).into());
    }

    tracing::info!(booking_id = id, user_id = auth.user_id, "Booking deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ensure_access(auth: &AuthUser, booking: &Booking) -> Result<(), BookingError> {
    if authorize_booking_access(&auth.actor(), booking.user_id).is_allowed() {
        Ok(())
    } else {
        tracing::info!(
            booking_id = booking.id,
            user_id = auth.user_id,
            "Booking access forbidden"
        );
        Err(BookingError::Forbidden)
    }
}

async fn load_details(state: &AppState, id: DbId) -> AppResult<BookingDetails> {
    BookingRepo::find_with_details(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::InternalError(format!("Booking {id} vanished after insert")))
}
