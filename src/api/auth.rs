//! Static auth-token check for `/v1` routes.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::v1::ErrorResponse;

/// Request header carrying the caller's token.
pub const AUTH_TOKEN_HEADER: &str = "Auth-Token";

/// Accepted tokens. A request passes when its token is a member of the set.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub tokens: HashSet<String>,
    /// Skip the check entirely (local development).
    pub bypass: bool,
}

impl AuthConfig {
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        Self {
            tokens: tokens.into_iter().filter(|t| !t.is_empty()).collect(),
            bypass: false,
        }
    }

    pub fn bypassed() -> Self {
        Self {
            tokens: HashSet::new(),
            bypass: true,
        }
    }
}

fn forbidden(message: String) -> Response {
    (StatusCode::FORBIDDEN, Json(ErrorResponse { error: message })).into_response()
}

/// Middleware rejecting requests without an accepted `Auth-Token` header.
pub async fn require_auth_token(
    State(auth): State<Arc<AuthConfig>>,
    request: Request,
    next: Next,
) -> Response {
    if auth.bypass {
        return next.run(request).await;
    }

    let token = request
        .headers()
        .get(AUTH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());

    let rejection = match token {
        None | Some("") => {
            warn!(path = %request.uri().path(), "Request without auth token");
            Some(format!("'{AUTH_TOKEN_HEADER}' header is not provided."))
        }
        Some(token) if !auth.tokens.contains(token) => {
            warn!(path = %request.uri().path(), "Request with unknown auth token");
            Some(format!("'{AUTH_TOKEN_HEADER}' header is invalid or expired."))
        }
        Some(_) => None,
    };

    match rejection {
        Some(message) => forbidden(message),
        None => next.run(request).await,
    }
}
