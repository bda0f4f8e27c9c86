//! Integration tests for use case endpoints.

use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::api::test_support::{request, send, test_app};

async fn create_theme(app: &axum::Router, title: &str) -> String {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/v1/prompts/themes",
            Some(json!({ "title": title, "subtitle": "Sub" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["uuid"].as_str().unwrap().to_string()
}

async fn create_use_case(app: &axum::Router, theme_uuid: &str, title: &str, position: Value) -> Value {
    let (status, body) = send(
        app,
        request(
            "POST",
            &format!("/v1/prompts/themes/{theme_uuid}/use-cases"),
            Some(json!({
                "title": title,
                "instruction": format!("Write a {title}"),
                "user_input_form": "Topic",
                "position": position,
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test(flavor = "multi_thread")]
async fn list_use_cases_of_theme_in_order() {
    let app = test_app().await;
    let theme_uuid = create_theme(&app, "Writing").await;

    create_use_case(&app, &theme_uuid, "Essay", Value::Null).await;
    create_use_case(&app, &theme_uuid, "Blog post", json!(1)).await;

    let (status, body) = send(
        &app,
        request("GET", &format!("/v1/prompts/themes/{theme_uuid}/use-cases"), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["theme_uuid"], theme_uuid.as_str());
    assert_eq!(body["title"], "Writing");
    let titles: Vec<_> = body["use_cases"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Blog post", "Essay"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_use_cases_of_unknown_theme_is_not_found() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        request("GET", "/v1/prompts/themes/nope/use-cases", None),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn get_use_case_directly_and_through_theme() {
    let app = test_app().await;
    let theme_uuid = create_theme(&app, "Writing").await;
    let other_theme = create_theme(&app, "Coding").await;
    let use_case = create_use_case(&app, &theme_uuid, "Essay", Value::Null).await;
    let uuid = use_case["uuid"].as_str().unwrap();

    let (status, body) = send(&app, request("GET", &format!("/v1/prompts/use-cases/{uuid}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["theme_uuid"], theme_uuid.as_str());

    let (status, _) = send(
        &app,
        request(
            "GET",
            &format!("/v1/prompts/themes/{theme_uuid}/use-cases/{uuid}"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        request(
            "GET",
            &format!("/v1/prompts/themes/{other_theme}/use-cases/{uuid}"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn update_use_case_can_move_it_to_another_theme() {
    let app = test_app().await;
    let writing = create_theme(&app, "Writing").await;
    let coding = create_theme(&app, "Coding").await;
    let use_case = create_use_case(&app, &writing, "Review", Value::Null).await;
    let uuid = use_case["uuid"].as_str().unwrap();

    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/v1/prompts/themes/{writing}/use-cases/{uuid}"),
            Some(json!({
                "title": "Code review",
                "instruction": "Review this diff",
                "user_input_form": "Diff",
                "theme_uuid": coding,
            })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["uuid"], uuid);
    assert_eq!(body["theme_uuid"], coding.as_str());
    assert_eq!(body["title"], "Code review");
}

#[tokio::test(flavor = "multi_thread")]
async fn create_use_case_with_blank_instruction_is_bad_request() {
    let app = test_app().await;
    let theme_uuid = create_theme(&app, "Writing").await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/v1/prompts/themes/{theme_uuid}/use-cases"),
            Some(json!({ "title": "Essay", "instruction": "", "user_input_form": "" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_use_case_hides_it() {
    let app = test_app().await;
    let theme_uuid = create_theme(&app, "Writing").await;
    let use_case = create_use_case(&app, &theme_uuid, "Essay", Value::Null).await;
    let uuid = use_case["uuid"].as_str().unwrap();

    let (status, _) = send(
        &app,
        request(
            "DELETE",
            &format!("/v1/prompts/themes/{theme_uuid}/use-cases/{uuid}"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, request("GET", &format!("/v1/prompts/use-cases/{uuid}"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app,
        request("GET", &format!("/v1/prompts/themes/{theme_uuid}/use-cases"), None),
    )
    .await;
    assert!(body["use_cases"].as_array().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_theme_hides_its_use_cases() {
    let app = test_app().await;
    let theme_uuid = create_theme(&app, "Writing").await;
    let use_case = create_use_case(&app, &theme_uuid, "Essay", Value::Null).await;
    let uuid = use_case["uuid"].as_str().unwrap();

    send(
        &app,
        request("DELETE", &format!("/v1/prompts/themes/{theme_uuid}"), None),
    )
    .await;

    let (status, _) = send(&app, request("GET", &format!("/v1/prompts/use-cases/{uuid}"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
