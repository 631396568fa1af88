//! Domain logic for the room booking service.
//!
//! Everything in this crate is pure: no database, no HTTP, no wall clock
//! except through [`clock::Clock`]. The `db` and `api` crates depend on it.

pub mod access;
pub mod booking;
pub mod clock;
pub mod error;
pub mod roles;
pub mod room;
pub mod types;
