//! Injectable source of "now".
//!
//! Booking validation rejects slots that start in the past and stamps
//! `created_at` / `updated_at`, so it must never read the wall clock directly.
//! Production code holds an `Arc<dyn Clock>` backed by [`SystemClock`]; tests
//! pin time with [`FixedClock`].

use std::sync::Mutex;

use chrono::Utc;

use crate::types::Timestamp;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Reads the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A clock frozen at a given instant. Can be moved with [`FixedClock::set`].
#[derive(Debug)]
pub struct FixedClock {
    instant: Mutex<Timestamp>,
}

impl FixedClock {
    pub fn new(instant: Timestamp) -> Self {
        Self {
            instant: Mutex::new(instant),
        }
    }

    pub fn set(&self, instant: Timestamp) {
        *self.instant.lock().unwrap_or_else(|e| e.into_inner()) = instant;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.instant.lock().unwrap_or_else(|e| e.into_inner())
    }
}
