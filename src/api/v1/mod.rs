//! V1 API handlers.

mod prompts;
mod themes;
mod use_cases;

#[cfg(test)]
mod use_cases_test;

use axum::{Json, http::StatusCode};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

pub use prompts::*;
pub use themes::*;
pub use use_cases::*;

use crate::db::DbError;
use crate::prompts::SyncError;

/// Error response DTO
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    #[schema(example = "Entity not found: Theme with id '0b9f...'")]
    pub error: String,
}

/// Rejection returned by every v1 handler.
pub type HandlerError = (StatusCode, Json<ErrorResponse>);

fn reject(status: StatusCode, message: String) -> HandlerError {
    (status, Json(ErrorResponse { error: message }))
}

pub(crate) fn db_error(e: DbError) -> HandlerError {
    let status = match &e {
        DbError::NotFound { .. } => StatusCode::NOT_FOUND,
        DbError::Validation { .. } => StatusCode::BAD_REQUEST,
        DbError::Constraint { .. } => StatusCode::CONFLICT,
        DbError::Connection { .. } => StatusCode::SERVICE_UNAVAILABLE,
        DbError::Database { .. } | DbError::Migration { .. } => {
            error!(error = %e, "Database failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    reject(status, e.to_string())
}

pub(crate) fn sync_error(e: SyncError) -> HandlerError {
    match e {
        SyncError::Persistence(e) => db_error(e),
        SyncError::Validation { .. } | SyncError::Conflict { .. } => {
            reject(StatusCode::BAD_REQUEST, e.to_string())
        }
        SyncError::Timeout { .. } => reject(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
    }
}
