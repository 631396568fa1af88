//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Most take `&PgPool`; the ones used inside the booking transaction take a
//! generic `PgExecutor` so they accept `&mut *tx` as well.

pub mod booking_repo;
pub mod room_repo;
pub mod user_repo;

pub use booking_repo::BookingRepo;
pub use room_repo::RoomRepo;
pub use user_repo::UserRepo;
