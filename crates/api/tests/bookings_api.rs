//! HTTP-level tests for bookings: conflict detection, time rules, ownership,
//! and the partial-update flow.
//!
//! The test app's clock is pinned to 2030-01-01T00:00Z; slots are on
//! 2030-01-10.

mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{body_json, delete_auth, get_auth, post_json_auth, put_json_auth, slot};
use roombook_core::roles::Role;
use roombook_core::types::DbId;
use serde_json::json;
use sqlx::PgPool;

fn booking_body(room_id: DbId, start: DateTime<Utc>, end: DateTime<Utc>) -> serde_json::Value {
    json!({
        "room_id": room_id,
        "start_time": start.to_rfc3339(),
        "end_time": end.to_rfc3339(),
        "purpose": "Team sync",
    })
}

/// Create a booking through the API and return its id.
async fn book(
    app: axum::Router,
    token: &str,
    room_id: DbId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> DbId {
    let response =
        post_json_auth(app, "/api/v1/bookings", booking_body(room_id, start, end), token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn create_returns_confirmed_booking_with_room_and_owner(pool: PgPool) {
    let room = common::create_room(&pool, "Room R").await;
    let (user, token) = common::create_user(&pool, "alice", Role::User).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/bookings",
        booking_body(room, slot(9, 0), slot(10, 0)),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["status"], "Confirmed");
    assert_eq!(json["user_id"], user.id);
    assert_eq!(json["room_id"], room);
    assert_eq!(json["room"]["name"], "Room R");
    assert_eq!(json["user"]["username"], "alice");
    assert_eq!(json["purpose"], "Team sync");
    assert!(json["updated_at"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn overlapping_booking_is_rejected_and_touching_is_accepted(pool: PgPool) {
    let room = common::create_room(&pool, "Room R").await;
    let (_, token) = common::create_user(&pool, "alice", Role::User).await;
    let (_, other) = common::create_user(&pool, "bob", Role::User).await;
    let app = common::build_test_app(pool);

    let first = book(app.clone(), &token, room, slot(9, 0), slot(10, 0)).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/bookings",
        booking_body(room, slot(9, 30), slot(10, 30)),
        &other,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "SLOT_CONFLICT");
    assert_eq!(json["error"], "Room is already booked for this time slot");

    let second = book(app, &other, room, slot(10, 0), slot(11, 0)).await;
    assert_ne!(first, second);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn same_slot_in_another_room_is_fine(pool: PgPool) {
    let room_a = common::create_room(&pool, "A").await;
    let room_b = common::create_room(&pool, "B").await;
    let (_, token) = common::create_user(&pool, "alice", Role::User).await;
    let app = common::build_test_app(pool);

    book(app.clone(), &token, room_a, slot(9, 0), slot(10, 0)).await;
    book(app, &token, room_b, slot(9, 0), slot(10, 0)).await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn time_rules_are_enforced(pool: PgPool) {
    let room = common::create_room(&pool, "Room R").await;
    let (_, token) = common::create_user(&pool, "alice", Role::User).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/bookings",
        booking_body(room, slot(9, 0), slot(9, 0)),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_TIME_RANGE");

    // 2029 is before the pinned clock.
    let past_start = common::test_now() - chrono::Duration::days(1);
    let response = post_json_auth(
        app,
        "/api/v1/bookings",
        booking_body(room, past_start, slot(10, 0)),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "PAST_BOOKING");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_room_is_bad_request(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "alice", Role::User).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/bookings",
        booking_body(987654, slot(9, 0), slot(10, 0)),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "ROOM_NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn booking_requires_credentials(pool: PgPool) {
    let room = common::create_room(&pool, "Room R").await;
    let app = common::build_test_app(pool);

    let response = common::post_json(
        app,
        "/api/v1/bookings",
        booking_body(room, slot(9, 0), slot(10, 0)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_overlapping_requests_book_at_most_once(pool: PgPool) {
    let room = common::create_room(&pool, "Hot Room").await;
    let (_, alice) = common::create_user(&pool, "alice", Role::User).await;
    let (_, bob) = common::create_user(&pool, "bob", Role::User).await;
    let app = common::build_test_app(pool.clone());

    let a = post_json_auth(
        app.clone(),
        "/api/v1/bookings",
        booking_body(room, slot(9, 0), slot(10, 0)),
        &alice,
    );
    let b = post_json_auth(
        app,
        "/api/v1/bookings",
        booking_body(room, slot(9, 30), slot(10, 30)),
        &bob,
    );
    let (a, b) = tokio::join!(a, b);

    let created = [a.status(), b.status()]
        .iter()
        .filter(|s| **s == StatusCode::CREATED)
        .count();
    assert_eq!(created, 1, "exactly one of two overlapping requests may win");

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings WHERE room_id = $1")
        .bind(room)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

// ---------------------------------------------------------------------------
// Read / list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn list_is_scoped_to_owner_unless_admin(pool: PgPool) {
    let room = common::create_room(&pool, "Room R").await;
    let (_, alice) = common::create_user(&pool, "alice", Role::User).await;
    let (_, bob) = common::create_user(&pool, "bob", Role::User).await;
    let (_, admin) = common::create_user(&pool, "root", Role::Admin).await;
    let app = common::build_test_app(pool);

    book(app.clone(), &alice, room, slot(9, 0), slot(10, 0)).await;
    book(app.clone(), &bob, room, slot(11, 0), slot(12, 0)).await;

    let mine = body_json(get_auth(app.clone(), "/api/v1/bookings", &alice).await).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["user"]["username"], "alice");

    let all = body_json(get_auth(app, "/api/v1/bookings", &admin).await).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reading_someone_elses_booking_is_forbidden(pool: PgPool) {
    let room = common::create_room(&pool, "Room R").await;
    let (_, alice) = common::create_user(&pool, "alice", Role::User).await;
    let (_, bob) = common::create_user(&pool, "bob", Role::User).await;
    let (_, admin) = common::create_user(&pool, "root", Role::Admin).await;
    let app = common::build_test_app(pool);

    let id = book(app.clone(), &alice, room, slot(9, 0), slot(10, 0)).await;
    let uri = format!("/api/v1/bookings/{id}");

    assert_eq!(get_auth(app.clone(), &uri, &alice).await.status(), StatusCode::OK);
    assert_eq!(get_auth(app.clone(), &uri, &admin).await.status(), StatusCode::OK);

    let response = get_auth(app.clone(), &uri, &bob).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app, "/api/v1/bookings/999999", &alice).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn owner_can_patch_purpose_and_window(pool: PgPool) {
    let room = common::create_room(&pool, "Room R").await;
    let (_, alice) = common::create_user(&pool, "alice", Role::User).await;
    let app = common::build_test_app(pool);

    let id = book(app.clone(), &alice, room, slot(9, 0), slot(10, 0)).await;
    let uri = format!("/api/v1/bookings/{id}");

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "purpose": "Retro", "end_time": slot(10, 30).to_rfc3339() }),
        &alice,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get_auth(app, &uri, &alice).await).await;
    assert_eq!(json["purpose"], "Retro");
    assert_eq!(json["start_time"], slot(9, 0).to_rfc3339().replace("+00:00", "Z"));
    assert_eq!(json["end_time"], slot(10, 30).to_rfc3339().replace("+00:00", "Z"));
    assert!(json["updated_at"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn moving_onto_another_booking_is_rejected(pool: PgPool) {
    let room = common::create_room(&pool, "Room R").await;
    let (_, alice) = common::create_user(&pool, "alice", Role::User).await;
    let app = common::build_test_app(pool);

    let id = book(app.clone(), &alice, room, slot(9, 0), slot(10, 0)).await;
    book(app.clone(), &alice, room, slot(11, 0), slot(12, 0)).await;

    let response = put_json_auth(
        app,
        &format!("/api/v1/bookings/{id}"),
        json!({ "end_time": slot(11, 30).to_rfc3339() }),
        &alice,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "SLOT_CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cancelling_frees_the_slot(pool: PgPool) {
    let room = common::create_room(&pool, "Room R").await;
    let (_, alice) = common::create_user(&pool, "alice", Role::User).await;
    let (_, bob) = common::create_user(&pool, "bob", Role::User).await;
    let app = common::build_test_app(pool);

    let id = book(app.clone(), &alice, room, slot(9, 0), slot(10, 0)).await;

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/bookings/{id}"),
        json!({ "status": "Cancelled" }),
        &alice,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    book(app.clone(), &bob, room, slot(9, 0), slot(10, 0)).await;

    // Reactivating the cancelled booking would now double-book.
    let response = put_json_auth(
        app,
        &format!("/api/v1/bookings/{id}"),
        json!({ "status": "Confirmed" }),
        &alice,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "SLOT_CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_rejects_unknown_status_and_inverted_range(pool: PgPool) {
    let room = common::create_room(&pool, "Room R").await;
    let (_, alice) = common::create_user(&pool, "alice", Role::User).await;
    let app = common::build_test_app(pool);

    let id = book(app.clone(), &alice, room, slot(9, 0), slot(10, 0)).await;
    let uri = format!("/api/v1/bookings/{id}");

    let response = put_json_auth(app.clone(), &uri, json!({ "status": "Done" }), &alice).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = put_json_auth(
        app,
        &uri,
        json!({ "start_time": slot(11, 0).to_rfc3339() }),
        &alice,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_TIME_RANGE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_owner_cannot_update(pool: PgPool) {
    let room = common::create_room(&pool, "Room R").await;
    let (_, alice) = common::create_user(&pool, "alice", Role::User).await;
    let (_, bob) = common::create_user(&pool, "bob", Role::User).await;
    let app = common::build_test_app(pool);

    let id = book(app.clone(), &alice, room, slot(9, 0), slot(10, 0)).await;
    let response = put_json_auth(
        app,
        &format!("/api/v1/bookings/{id}"),
        json!({ "purpose": "Hijacked" }),
        &bob,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn started_booking_keeps_its_start_but_stays_editable(pool: PgPool) {
    let room = common::create_room(&pool, "Room R").await;
    let (_, alice) = common::create_user(&pool, "alice", Role::User).await;
    let (app, clock) = common::build_test_app_with_clock(pool);

    let id = book(app.clone(), &alice, room, slot(9, 0), slot(10, 0)).await;
    clock.set(slot(9, 30));

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/bookings/{id}"),
        json!({ "start_time": slot(9, 15).to_rfc3339() }),
        &alice,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "PAST_BOOKING");

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/bookings/{id}"),
        json!({ "purpose": "Ran long", "end_time": slot(10, 30).to_rfc3339() }),
        &alice,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let json = body_json(get_auth(app, &format!("/api/v1/bookings/{id}"), &alice).await).await;
    assert_eq!(json["purpose"], "Ran long");
    assert_eq!(json["end_time"], slot(10, 30).to_rfc3339().replace("+00:00", "Z"));
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn only_owner_or_admin_may_delete(pool: PgPool) {
    let room = common::create_room(&pool, "Room R").await;
    let (_, alice) = common::create_user(&pool, "alice", Role::User).await;
    let (_, bob) = common::create_user(&pool, "bob", Role::User).await;
    let (_, admin) = common::create_user(&pool, "root", Role::Admin).await;
    let app = common::build_test_app(pool);

    let id = book(app.clone(), &alice, room, slot(9, 0), slot(10, 0)).await;
    let uri = format!("/api/v1/bookings/{id}");

    let response = delete_auth(app.clone(), &uri, &bob).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(app, &uri, &alice).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
