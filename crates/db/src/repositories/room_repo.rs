//! Repository for the `rooms` table.

use roombook_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::room::{CreateRoom, Room, UpdateRoom};

const COLUMNS: &str = "id, name, description, capacity, location, price_per_hour, \
                       is_available, created_at, updated_at";

/// Provides CRUD operations for rooms.
pub struct RoomRepo;

impl RoomRepo {
    /// Insert a new room, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateRoom) -> Result<Room, sqlx::Error> {
        let query = format!(
            "INSERT INTO rooms (name, description, capacity, location, price_per_hour, is_available)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, TRUE))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.capacity)
            .bind(&input.location)
            .bind(input.price_per_hour)
            .bind(input.is_available)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1");
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all rooms ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms ORDER BY name, id");
        sqlx::query_as::<_, Room>(&query).fetch_all(pool).await
    }

    /// Update a room. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRoom,
    ) -> Result<Option<Room>, sqlx::Error> {
        let query = format!(
            "UPDATE rooms SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                capacity = COALESCE($4, capacity),
                location = COALESCE($5, location),
                price_per_hour = COALESCE($6, price_per_hour),
                is_available = COALESCE($7, is_available)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.capacity)
            .bind(&input.location)
            .bind(input.price_per_hour)
            .bind(input.is_available)
            .fetch_optional(pool)
            .await
    }

    /// Delete a room and, by cascade, its bookings. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists_by_id<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM rooms WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    /// Take a row lock on the room for the rest of the enclosing transaction.
    ///
    /// Concurrent booking writers for the same room queue up behind this
    /// lock, which makes their read-validate-write sequences serial. Returns
    /// `false` when the room does not exist.
    pub async fn lock_for_update<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row: Option<(DbId,)> = sqlx::query_as("SELECT id FROM rooms WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row.is_some())
    }
}
