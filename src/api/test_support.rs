//! Shared helpers for router tests.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::api::{AUTH_TOKEN_HEADER, AppState, AuthConfig, create_router};
use crate::db::{Database, SqliteDatabase};
use crate::prompts::SyncConfig;

pub const TEST_TOKEN: &str = "test-token";

/// Create a test app with an in-memory database and one accepted token.
pub async fn test_app() -> Router {
    test_app_with(AuthConfig::new([TEST_TOKEN.to_string()])).await
}

pub async fn test_app_with(auth: AuthConfig) -> Router {
    let db = SqliteDatabase::in_memory().await.unwrap();
    db.migrate().await.unwrap();
    create_router(AppState::new(db, SyncConfig::default()), auth)
}

/// Build an authenticated request, with a JSON body when given.
pub fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTH_TOKEN_HEADER, TEST_TOKEN);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request and return the status with the parsed body (`Null` when empty).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        // axum's own rejections are plain text
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}
