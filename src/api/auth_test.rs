//! Tests for the auth-token middleware.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

use crate::api::AuthConfig;
use crate::api::test_support::{request, send, test_app, test_app_with};

#[tokio::test(flavor = "multi_thread")]
async fn health_is_public() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_token_is_forbidden() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/v1/prompts/themes")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("not provided"));
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_token_is_forbidden() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Request::builder()
            .uri("/v1/prompts/bulk")
            .header("Auth-Token", "nope")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("invalid"));
}

#[tokio::test(flavor = "multi_thread")]
async fn any_configured_token_is_accepted() {
    let app = test_app_with(AuthConfig::new(["first".to_string(), "second".to_string()])).await;

    for token in ["first", "second"] {
        let (status, _) = send(
            &app,
            Request::builder()
                .uri("/v1/prompts/themes")
                .header("Auth-Token", token)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "token {token} should be accepted");
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn bypass_skips_the_check() {
    let app = test_app_with(AuthConfig::bypassed()).await;

    let (status, _) = send(
        &app,
        Request::builder()
            .uri("/v1/prompts/themes")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread")]
async fn no_configured_tokens_rejects_everything() {
    let app = test_app_with(AuthConfig::default()).await;

    let (status, _) = send(&app, request("GET", "/v1/prompts/themes", None)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test(flavor = "multi_thread")]
async fn docs_are_public() {
    let app = test_app().await;

    let response = app
        .oneshot(Request::builder().uri("/docs").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
