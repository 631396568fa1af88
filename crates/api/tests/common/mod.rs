#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use roombook_api::auth::jwt::{generate_access_token, JwtConfig};
use roombook_api::auth::password::hash_password;
use roombook_api::config::ServerConfig;
use roombook_api::router::build_app_router;
use roombook_api::state::AppState;
use roombook_core::clock::FixedClock;
use roombook_core::roles::Role;
use roombook_core::types::DbId;
use roombook_db::models::room::CreateRoom;
use roombook_db::models::user::{CreateUser, UserResponse};
use roombook_db::repositories::{RoomRepo, UserRepo};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// The instant every test app believes is "now": 2030-01-01T00:00:00Z.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
}

/// 2030-01-10 at the given UTC time, nine days after [`test_now`].
pub fn slot(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, 10, hour, min, 0).unwrap()
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        expiry_mins: 60,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: test_jwt_config(),
        bootstrap_admin: None,
    }
}

/// Build the full application router, pinned to [`test_now`].
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_clock(pool).0
}

/// Like [`build_test_app`], also returning the clock so a test can move time.
pub fn build_test_app_with_clock(pool: PgPool) -> (Router, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(test_now()));
    let app = build_app_router(AppState::with_clock(pool, test_config(), clock.clone()));
    (app, clock)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] and return it with a valid bearer token.
pub async fn create_user(pool: &PgPool, username: &str, role: Role) -> (UserResponse, String) {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role,
    };
    let user = UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed");
    let user = UserResponse::from(&user);
    let token = generate_access_token(&user, &test_jwt_config()).expect("token should encode");
    (user, token)
}

pub async fn create_room(pool: &PgPool, name: &str) -> DbId {
    RoomRepo::create(
        pool,
        &CreateRoom {
            name: name.to_string(),
            description: Some("Test room".to_string()),
            capacity: 8,
            location: Some("Floor 3".to_string()),
            price_per_hour: Some(40.0),
            is_available: None,
        },
    )
    .await
    .expect("room creation should succeed")
    .id
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
