//! REST API for the prompt catalogue.
//!
//! Exposes theme/use-case management and bulk upload/download under `/v1`,
//! guarded by the `Auth-Token` header check, plus public health and docs
//! endpoints.

mod auth;
mod handlers;
mod routes;
mod state;
mod v1;

#[cfg(test)]
mod auth_test;
#[cfg(test)]
mod test_support;

use std::net::{IpAddr, Ipv4Addr};

use miette::Diagnostic;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use auth::{AUTH_TOKEN_HEADER, AuthConfig};
pub use routes::{ApiDoc, create_router};
pub use state::AppState;

use crate::db::{Database, DbError};
use crate::prompts::SyncConfig;

/// API server errors.
#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Failed to bind {addr}: {source}")]
    #[diagnostic(
        code(prompt_catalog::api::bind),
        help("Check that the port is free or pass a different --port")
    )]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    #[diagnostic(code(prompt_catalog::api::serve))]
    Serve(std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(prompt_catalog::api::database))]
    Database(#[from] DbError),
}

/// API server configuration
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Accepted `Auth-Token` values for `/v1` routes
    pub auth: AuthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 5312,
            auth: AuthConfig::default(),
        }
    }
}

/// Initialize tracing subscriber with env filter
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prompt_catalog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the API server with the given configuration.
///
/// Migrations run before the listener is bound.
pub async fn run<D: Database>(config: Config, db: D, sync: SyncConfig) -> Result<(), ApiError> {
    init_tracing();

    db.migrate().await?;
    info!("Database migrations complete");

    if config.auth.bypass {
        warn!("Auth token check is disabled; /v1 is open to every caller");
    } else if config.auth.tokens.is_empty() {
        warn!("No auth tokens configured; every /v1 request will be rejected");
    }

    let state = AppState::new(db, sync);
    let engine_config = state.engine().config();
    info!(
        timeout = ?engine_config.reconcile_timeout,
        duplicate_policy = ?engine_config.duplicate_policy,
        "Prompt sync engine ready"
    );

    let app = routes::create_router(state, config.auth).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ApiError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app).await.map_err(ApiError::Serve)?;
    Ok(())
}
