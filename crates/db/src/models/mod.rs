//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - a `FromRow` struct matching the table
//! - `Deserialize` create/update DTOs where the table is written from the API

pub mod booking;
pub mod room;
pub mod user;
