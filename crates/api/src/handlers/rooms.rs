//! Handlers for the `/rooms` resource.
//!
//! The catalog is public; writes are admin-only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use roombook_core::access::{authorize_room_read, authorize_room_write};
use roombook_core::error::CoreError;
use roombook_core::room::validate_room_fields;
use roombook_core::types::DbId;
use roombook_db::models::room::{CreateRoom, Room, UpdateRoom};
use roombook_db::repositories::RoomRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/rooms
pub async fn list_rooms(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
) -> AppResult<Json<Vec<Room>>> {
    ensure_can_read(auth.as_ref())?;
    let rooms = RoomRepo::list(&state.pool).await?;
    Ok(Json(rooms))
}

/// GET /api/v1/rooms/{id}
pub async fn get_room(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Room>> {
    ensure_can_read(auth.as_ref())?;
    let room = RoomRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Room", id }))?;
    Ok(Json(room))
}

/// POST /api/v1/rooms
pub async fn create_room(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateRoom>,
) -> AppResult<(StatusCode, Json<Room>)> {
    ensure_can_write(&auth)?;
    validate_room_fields(
        Some(&input.name),
        input.description.as_deref(),
        input.location.as_deref(),
        Some(input.capacity),
        input.price_per_hour,
    )?;

    let room = RoomRepo::create(&state.pool, &input).await?;
    tracing::info!(room_id = room.id, user_id = auth.user_id, "Room created");
    Ok((StatusCode::CREATED, Json(room)))
}

/// PUT /api/v1/rooms/{id}
///
/// Partial update: omitted fields are left unchanged.
pub async fn update_room(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRoom>,
) -> AppResult<StatusCode> {
    ensure_can_write(&auth)?;
    validate_room_fields(
        input.name.as_deref(),
        input.description.as_deref(),
        input.location.as_deref(),
        input.capacity,
        input.price_per_hour,
    )?;

    RoomRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Room", id }))?;
    tracing::info!(room_id = id, user_id = auth.user_id, "Room updated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/rooms/{id}
///
/// Bookings on the room are removed with it.
pub async fn delete_room(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_can_write(&auth)?;
    if !RoomRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Room", id }));
    }
    tracing::info!(room_id = id, user_id = auth.user_id, "Room deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ensure_can_read(auth: Option<&AuthUser>) -> AppResult<()> {
    let actor = auth.map(AuthUser::actor);
    if !authorize_room_read(actor.as_ref()).is_allowed() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not allowed to view rooms".into(),
        )));
    }
    Ok(())
}

fn ensure_can_write(auth: &AuthUser) -> AppResult<()> {
    if !authorize_room_write(&auth.actor()).is_allowed() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Admin role required".into(),
        )));
    }
    Ok(())
}
