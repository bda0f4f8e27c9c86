//! Prompt catalogue API server binary.
//!
//! This binary creates the concrete database implementation and passes it
//! to the API server. The API layer remains agnostic of the storage backend.

use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use miette::Diagnostic;
use prompt_catalog::api::{self, ApiError, AuthConfig, Config};
use prompt_catalog::db::{DbError, SqliteDatabase};
use prompt_catalog::paths;
use prompt_catalog::prompts::{DuplicatePolicy, SyncConfig};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Database error: {0}")]
    #[diagnostic(code(prompt_catalog::binary::database))]
    Database(#[from] DbError),

    #[error("Failed to create data directory: {0}")]
    #[diagnostic(code(prompt_catalog::binary::io))]
    Io(#[from] std::io::Error),

    #[error("No database path given and neither XDG_DATA_HOME nor HOME is set")]
    #[diagnostic(
        code(prompt_catalog::binary::no_db_path),
        help("Pass --db /path/to/prompts.db or set PCAT_DB")
    )]
    NoDbPath,

    #[error("API server error: {0}")]
    #[diagnostic(code(prompt_catalog::binary::api))]
    Api(#[from] ApiError),
}

#[derive(Parser)]
#[command(name = "pcat-api")]
#[command(author, version, about = "Prompt catalogue API server", long_about = None)]
struct Cli {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value = "5312")]
    port: u16,

    /// Database file path (defaults to ~/.local/share/pcat/prompts.db)
    #[arg(long, env = "PCAT_DB")]
    db: Option<PathBuf>,

    /// Accepted Auth-Token values (repeat or comma-separate)
    #[arg(
        long = "auth-token",
        env = "PCAT_AUTH_TOKENS",
        value_delimiter = ',',
        hide_env_values = true
    )]
    auth_tokens: Vec<String>,

    /// Skip the Auth-Token check entirely (local development only)
    #[arg(long, env = "PCAT_BYPASS_AUTH")]
    bypass_auth: bool,

    /// Seconds a bulk upload may wait and run before giving up
    #[arg(long, default_value = "30")]
    reconcile_timeout_secs: u64,

    /// How to treat repeated theme or use case rows that disagree on position
    #[arg(long, value_enum, default_value_t = DuplicatePolicy::LastWins)]
    duplicate_policy: DuplicatePolicy,
}

#[tokio::main]
async fn main() -> Result<(), BinaryError> {
    let cli = Cli::parse();

    let db_path = match cli.db {
        Some(path) => path,
        None => paths::db_path().ok_or(BinaryError::NoDbPath)?,
    };

    println!("Opening database at {:?}", db_path);

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = SqliteDatabase::open(&db_path).await?;

    let mut auth = AuthConfig::new(cli.auth_tokens);
    auth.bypass = cli.bypass_auth;

    api::run(
        Config {
            host: cli.host,
            port: cli.port,
            auth,
        },
        db,
        SyncConfig {
            reconcile_timeout: Duration::from_secs(cli.reconcile_timeout_secs),
            duplicate_policy: cli.duplicate_policy,
        },
    )
    .await?;

    Ok(())
}
