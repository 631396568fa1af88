use axum::routing::get;
use axum::Router;

use crate::handlers::bookings;
use crate::state::AppState;

/// Routes mounted at `/bookings`. All require auth.
///
/// ```text
/// GET    /      -> list_bookings
/// POST   /      -> create_booking
/// GET    /{id}  -> get_booking
/// PUT    /{id}  -> update_booking
/// DELETE /{id}  -> delete_booking
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(bookings::list_bookings).post(bookings::create_booking))
        .route(
            "/{id}",
            get(bookings::get_booking)
                .put(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
}
