//! Liveness and readiness for the booking service.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use roombook_core::types::Timestamp;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database or the booking guard is missing.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// The overlap exclusion constraint on `bookings` is present.
    pub booking_guard: bool,
    /// The instant booking validation currently treats as "now".
    pub server_time: Timestamp,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (db_healthy, booking_guard) = match roombook_db::booking_guard_installed(&state.pool).await
    {
        Ok(installed) => (true, installed),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            (false, false)
        }
    };

    if db_healthy && !booking_guard {
        tracing::warn!("Booking exclusion constraint is missing");
    }

    Json(HealthResponse {
        status: if db_healthy && booking_guard { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        booking_guard,
        server_time: state.validator.now(),
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
