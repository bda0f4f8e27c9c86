use serde_json::json;

use crate::cli::api_client::ApiClient;
use crate::cli::commands::prompts::*;
use crate::cli::error::CliError;
use crate::cli::test_server::{spawn_test_server, test_client};
use crate::db::PrebuiltPrompt;

fn write_prompts(dir: &tempfile::TempDir, value: serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join("prompts.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&value).unwrap()).unwrap();
    path
}

fn sample() -> serde_json::Value {
    json!([
        {
            "theme_title": "Writing",
            "theme_subtitle": "Drafts",
            "theme_position": 1,
            "use_case_title": "Blog post",
            "use_case_instruction": "Write a blog post",
            "use_case_user_input_form": "Topic"
        },
        {
            "theme_title": "Writing",
            "theme_subtitle": "Drafts",
            "theme_position": 1,
            "use_case_title": "Essay",
            "use_case_instruction": "Write an essay",
            "use_case_user_input_form": "Topic"
        }
    ])
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_then_pull_to_file() {
    let (url, _handle) = spawn_test_server().await;
    let client = test_client(&url);
    let dir = tempfile::tempdir().unwrap();
    let input = write_prompts(&dir, sample());

    let output = push(&client, &input).await.unwrap();
    assert!(output.contains("Uploaded 2 prompts"));
    assert!(output.contains("Themes: 1 created"));
    assert!(output.contains("Use cases: 2 created"));

    let pulled = dir.path().join("pulled.json");
    let output = pull(&client, Some(&pulled)).await.unwrap();
    assert!(output.contains("Wrote 2 prompts"));

    let rows = read_prompt_file(&pulled).unwrap();
    let titles: Vec<_> = rows.iter().map(|r| r.use_case_title.as_str()).collect();
    assert_eq!(titles, vec!["Blog post", "Essay"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pull_to_stdout_is_json_array() {
    let (url, _handle) = spawn_test_server().await;
    let client = test_client(&url);
    let dir = tempfile::tempdir().unwrap();
    push(&client, &write_prompts(&dir, sample())).await.unwrap();

    let output = pull(&client, None).await.unwrap();

    let rows: Vec<PrebuiltPrompt> = serde_json::from_str(&output).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].theme_position, Some(1));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pushing_pulled_file_changes_nothing() {
    let (url, _handle) = spawn_test_server().await;
    let client = test_client(&url);
    let dir = tempfile::tempdir().unwrap();
    push(&client, &write_prompts(&dir, sample())).await.unwrap();

    let pulled = dir.path().join("pulled.json");
    pull(&client, Some(&pulled)).await.unwrap();
    let output = push(&client, &pulled).await.unwrap();

    assert!(output.contains("Themes: 0 created, 0 revived, 0 updated, 0 deleted"));
    assert!(output.contains("Use cases: 0 created, 0 revived, 0 updated, 0 deleted"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_invalid_row_reports_api_error() {
    let (url, _handle) = spawn_test_server().await;
    let client = test_client(&url);
    let dir = tempfile::tempdir().unwrap();
    let mut rows = sample();
    rows[1]["use_case_instruction"] = json!("");
    let input = write_prompts(&dir, rows);

    match push(&client, &input).await {
        Err(CliError::ApiError { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.contains("row 1"));
        }
        other => panic!("Expected ApiError, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_without_token_is_forbidden() {
    let (url, _handle) = spawn_test_server().await;
    let client = ApiClient::new(Some(url), None);
    let dir = tempfile::tempdir().unwrap();

    let result = push(&client, &write_prompts(&dir, sample())).await;

    assert!(matches!(result, Err(CliError::ApiError { status: 403, .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_missing_file_is_io_error() {
    let client = ApiClient::new(Some("http://127.0.0.1:1".to_string()), None);
    let dir = tempfile::tempdir().unwrap();

    let result = push(&client, &dir.path().join("missing.json")).await;

    assert!(matches!(result, Err(CliError::Io { .. })));
}

#[test]
fn test_read_prompt_file_rejects_non_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_prompts(&dir, json!({ "prompts": [] }));

    assert!(matches!(
        read_prompt_file(&path),
        Err(CliError::InvalidFile { .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pull_without_server_is_connection_error() {
    let client = ApiClient::new(Some("http://127.0.0.1:1".to_string()), None);

    let result = pull(&client, None).await;

    assert!(matches!(result, Err(CliError::ConnectionFailed { .. })));
}
