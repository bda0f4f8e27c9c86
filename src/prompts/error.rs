//! Sync engine error types.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

use crate::db::DbError;

/// Errors from reconciling or reading the prompt catalogue.
///
/// Validation and Conflict are raised before a transaction starts; any
/// other failure means the transaction was rolled back. Either way the
/// catalogue is never left partially reconciled.
#[derive(Error, Diagnostic, Debug)]
pub enum SyncError {
    #[error("Invalid prompt at row {index}: {field} must not be blank")]
    #[diagnostic(
        code(prompt_catalog::sync::validation),
        help("Every row needs a theme title and subtitle, a use case title and an instruction")
    )]
    Validation { index: usize, field: &'static str },

    #[error("Conflicting duplicate in submission: {message}")]
    #[diagnostic(
        code(prompt_catalog::sync::conflict),
        help("Give every occurrence of the same theme or use case the same position")
    )]
    Conflict { message: String },

    #[error(transparent)]
    #[diagnostic(code(prompt_catalog::sync::persistence))]
    Persistence(#[from] DbError),

    #[error("Reconcile did not finish within {timeout:?}; no changes were applied")]
    #[diagnostic(
        code(prompt_catalog::sync::timeout),
        help("Another upload may be in progress. Retry later")
    )]
    Timeout { timeout: Duration },
}

impl SyncError {
    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Timeout { .. } => true,
            SyncError::Persistence(e) => e.is_transient(),
            SyncError::Validation { .. } | SyncError::Conflict { .. } => false,
        }
    }
}

/// Result type for sync engine operations.
pub type SyncResult<T> = Result<T, SyncError>;
