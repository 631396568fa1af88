//! PostgreSQL persistence for users, rooms and bookings.
//!
//! Repositories are zero-sized structs with async associated functions. The
//! ones that take part in the booking critical section accept any
//! [`sqlx::PgExecutor`] so they can run on the pool or inside a transaction.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to prove the pool can reach the server.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Whether the `ex_bookings_room_slot` exclusion constraint is installed.
///
/// Without it, overlapping active bookings are only prevented by the
/// application-level room lock.
pub async fn booking_guard_installed(pool: &DbPool) -> Result<bool, sqlx::Error> {
    let (installed,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (
             SELECT 1 FROM pg_constraint
             WHERE conname = 'ex_bookings_room_slot' AND contype = 'x'
         )",
    )
    .fetch_one(pool)
    .await?;
    Ok(installed)
}

/// Apply the embedded migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
