//! A real HTTP server on a random port for CLI command tests.

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::api::{AppState, AuthConfig, create_router};
use crate::cli::api_client::ApiClient;
use crate::db::{Database, SqliteDatabase};
use crate::prompts::SyncConfig;

pub const TEST_TOKEN: &str = "cli-test-token";

/// Spawn the API on 127.0.0.1 with an in-memory database and return its URL.
pub async fn spawn_test_server() -> (String, JoinHandle<()>) {
    let db = SqliteDatabase::in_memory().await.unwrap();
    db.migrate().await.unwrap();
    let app = create_router(
        AppState::new(db, SyncConfig::default()),
        AuthConfig::new([TEST_TOKEN.to_string()]),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (url, handle)
}

/// A client that authenticates against [`spawn_test_server`].
pub fn test_client(url: &str) -> ApiClient {
    ApiClient::new(Some(url.to_string()), Some(TEST_TOKEN.to_string()))
}
