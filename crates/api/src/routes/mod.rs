pub mod admin;
pub mod auth;
pub mod bookings;
pub mod health;
pub mod rooms;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                 register (public)
/// /auth/login                    login (public)
/// /auth/me                       current user (requires auth)
///
/// /rooms                         list (public), create (admin)
/// /rooms/{id}                    get (public), update, delete (admin)
///
/// /bookings                      list (own, or all for admin), create
/// /bookings/{id}                 get, update, delete (owner or admin)
///
/// /admin/users                   list (admin only)
/// /admin/users/{id}/role         change role (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/rooms", rooms::router())
        .nest("/bookings", bookings::router())
        .nest("/admin", admin::router())
}
