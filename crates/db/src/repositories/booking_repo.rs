//! Repository for the `bookings` table.

use roombook_core::access::ListScope;
use roombook_core::booking::{Booking, BookingStatus, NewBooking};
use roombook_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::booking::{BookingDetails, BookingDetailsRow, BookingRow};

const COLUMNS: &str =
    "id, room_id, user_id, start_time, end_time, purpose, status, created_at, updated_at";

/// Booking columns qualified with `b.` plus the joined room and owner fields
/// expected by [`BookingDetailsRow`].
const DETAILS_SELECT: &str = "SELECT b.id, b.room_id, b.user_id, b.start_time, b.end_time, \
        b.purpose, b.status, b.created_at, b.updated_at, \
        r.name AS room_name, r.description AS room_description, r.capacity AS room_capacity, \
        r.location AS room_location, r.price_per_hour AS room_price_per_hour, \
        r.is_available AS room_is_available, \
        u.username, u.email, u.role AS user_role \
     FROM bookings b \
     JOIN rooms r ON r.id = b.room_id \
     JOIN users u ON u.id = b.user_id";

/// Provides CRUD operations for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Every non-cancelled booking on `room_id`, in start order.
    pub async fn find_by_room<'e, E>(executor: E, room_id: DbId) -> Result<Vec<Booking>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE room_id = $1 AND status <> $2
             ORDER BY start_time"
        );
        let rows = sqlx::query_as::<_, BookingRow>(&query)
            .bind(room_id)
            .bind(BookingStatus::Cancelled.as_str())
            .fetch_all(executor)
            .await?;
        Ok(rows.into_iter().map(Booking::from).collect())
    }

    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Booking>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        let row = sqlx::query_as::<_, BookingRow>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row.map(Booking::from))
    }

    /// One booking with its room and owner embedded.
    pub async fn find_with_details(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BookingDetails>, sqlx::Error> {
        let query = format!("{DETAILS_SELECT} WHERE b.id = $1");
        let row = sqlx::query_as::<_, BookingDetailsRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(BookingDetails::from))
    }

    /// Bookings visible under `scope`, with room and owner embedded, in start order.
    pub async fn list_with_details(
        pool: &PgPool,
        scope: ListScope,
    ) -> Result<Vec<BookingDetails>, sqlx::Error> {
        let owner = match scope {
            ListScope::All => None,
            ListScope::OwnedBy(user_id) => Some(user_id),
        };
        let query = format!(
            "{DETAILS_SELECT}
             WHERE ($1::BIGINT IS NULL OR b.user_id = $1)
             ORDER BY b.start_time, b.id"
        );
        let rows = sqlx::query_as::<_, BookingDetailsRow>(&query)
            .bind(owner)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(BookingDetails::from).collect())
    }

    /// Insert a validated booking, returning it with its assigned id.
    pub async fn create<'e, E>(executor: E, input: &NewBooking) -> Result<Booking, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO bookings (room_id, user_id, start_time, end_time, purpose, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, BookingRow>(&query)
            .bind(input.room_id)
            .bind(input.user_id)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.purpose)
            .bind(input.status.as_str())
            .bind(input.created_at)
            .fetch_one(executor)
            .await?;
        Ok(row.into())
    }

    /// Write back the mutable fields of `booking`.
    ///
    /// Returns `None` if the row no longer exists.
    pub async fn update<'e, E>(executor: E, booking: &Booking) -> Result<Option<Booking>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE bookings SET
                start_time = $2,
                end_time = $3,
                purpose = $4,
                status = $5,
                updated_at = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, BookingRow>(&query)
            .bind(booking.id)
            .bind(booking.start_time)
            .bind(booking.end_time)
            .bind(&booking.purpose)
            .bind(booking.status.as_str())
            .bind(booking.updated_at)
            .fetch_optional(executor)
            .await?;
        Ok(row.map(Booking::from))
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists_by_id(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM bookings WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }
}
