//! Booking rows.
//!
//! The domain entity lives in `roombook_core::booking`; [`BookingRow`] is its
//! storage shape and [`BookingDetails`] is the joined form returned to
//! clients, with the room and the owner embedded.

use roombook_core::booking::{Booking, BookingStatus};
use roombook_core::roles::Role;
use roombook_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow)]
pub struct BookingRow {
    pub id: DbId,
    pub room_id: DbId,
    pub user_id: DbId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub purpose: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            room_id: row.room_id,
            user_id: row.user_id,
            start_time: row.start_time,
            end_time: row.end_time,
            purpose: row.purpose,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Booking joined with its room and owner, as flat columns.
#[derive(Debug, Clone, FromRow)]
pub struct BookingDetailsRow {
    #[sqlx(flatten)]
    pub booking: BookingRow,
    pub room_name: String,
    pub room_description: Option<String>,
    pub room_capacity: i32,
    pub room_location: Option<String>,
    pub room_price_per_hour: Option<f64>,
    pub room_is_available: bool,
    pub username: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub user_role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomSummary {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
    pub location: Option<String>,
    pub price_per_hour: Option<f64>,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// API-facing booking with its room and owner embedded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub room: RoomSummary,
    pub user: UserSummary,
}

impl From<BookingDetailsRow> for BookingDetails {
    fn from(row: BookingDetailsRow) -> Self {
        let room = RoomSummary {
            id: row.booking.room_id,
            name: row.room_name,
            description: row.room_description,
            capacity: row.room_capacity,
            location: row.room_location,
            price_per_hour: row.room_price_per_hour,
            is_available: row.room_is_available,
        };
        let user = UserSummary {
            id: row.booking.user_id,
            username: row.username,
            email: row.email,
            role: row.user_role,
        };
        BookingDetails {
            booking: row.booking.into(),
            room,
            user,
        }
    }
}
