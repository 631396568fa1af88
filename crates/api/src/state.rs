use std::sync::Arc;

use roombook_core::booking::BookingValidator;
use roombook_core::clock::{Clock, SystemClock};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted and everything else is
/// behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: roombook_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Booking rules, with the clock they read "now" from.
    pub validator: BookingValidator,
}

impl AppState {
    /// State backed by the system wall clock.
    pub fn new(pool: roombook_db::DbPool, config: ServerConfig) -> Self {
        Self::with_clock(pool, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        pool: roombook_db::DbPool,
        config: ServerConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            validator: BookingValidator::new(clock),
        }
    }
}
