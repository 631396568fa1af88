//! Room row model and DTOs.

use roombook_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `rooms` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Room {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
    pub location: Option<String>,
    pub price_per_hour: Option<f64>,
    pub is_available: bool,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

/// DTO for creating a room. `is_available` defaults to `true`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoom {
    pub name: String,
    pub description: Option<String>,
    pub capacity: i32,
    pub location: Option<String>,
    pub price_per_hour: Option<f64>,
    pub is_available: Option<bool>,
}

/// DTO for updating a room. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRoom {
    pub name: Option<String>,
    pub description: Option<String>,
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub price_per_hour: Option<f64>,
    pub is_available: Option<bool>,
}
