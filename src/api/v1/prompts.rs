//! Bulk prompt upload and download handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use super::{ErrorResponse, HandlerError, sync_error};
use crate::api::AppState;
use crate::db::{Database, EntityCounts, PrebuiltPrompt, SyncSummary};

// =============================================================================
// DTOs (Data Transfer Objects)
// =============================================================================

/// One (theme, use case) pair in a bulk upload or download
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrebuiltPromptDto {
    #[schema(example = "Writing")]
    pub theme_title: String,
    #[schema(example = "Drafts and edits")]
    pub theme_subtitle: String,
    /// Explicit sort key; omitted themes sort last in upload order
    #[schema(example = 1)]
    #[serde(default)]
    pub theme_position: Option<i64>,
    #[schema(example = "Blog post")]
    pub use_case_title: String,
    #[schema(example = "Write a blog post about the topic below.")]
    pub use_case_instruction: String,
    #[schema(example = "Topic")]
    pub use_case_user_input_form: String,
    #[serde(default)]
    pub use_case_position: Option<i64>,
}

impl From<PrebuiltPromptDto> for PrebuiltPrompt {
    fn from(p: PrebuiltPromptDto) -> Self {
        Self {
            theme_title: p.theme_title,
            theme_subtitle: p.theme_subtitle,
            theme_position: p.theme_position,
            use_case_title: p.use_case_title,
            use_case_instruction: p.use_case_instruction,
            use_case_user_input_form: p.use_case_user_input_form,
            use_case_position: p.use_case_position,
        }
    }
}

impl From<PrebuiltPrompt> for PrebuiltPromptDto {
    fn from(p: PrebuiltPrompt) -> Self {
        Self {
            theme_title: p.theme_title,
            theme_subtitle: p.theme_subtitle,
            theme_position: p.theme_position,
            use_case_title: p.use_case_title,
            use_case_instruction: p.use_case_instruction,
            use_case_user_input_form: p.use_case_user_input_form,
            use_case_position: p.use_case_position,
        }
    }
}

/// Whole catalogue as ordered prompt rows
#[derive(Serialize, ToSchema)]
pub struct PrebuiltPromptsResponse {
    pub prompts: Vec<PrebuiltPromptDto>,
}

#[derive(Serialize, ToSchema)]
pub struct EntityCountsResponse {
    pub created: usize,
    pub revived: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl From<EntityCounts> for EntityCountsResponse {
    fn from(c: EntityCounts) -> Self {
        Self {
            created: c.created,
            revived: c.revived,
            updated: c.updated,
            deleted: c.deleted,
        }
    }
}

/// What a bulk upload changed
#[derive(Serialize, ToSchema)]
pub struct SyncSummaryResponse {
    pub themes: EntityCountsResponse,
    pub use_cases: EntityCountsResponse,
}

impl From<SyncSummary> for SyncSummaryResponse {
    fn from(s: SyncSummary) -> Self {
        Self {
            themes: s.themes.into(),
            use_cases: s.use_cases.into(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Download all prompts
///
/// Returns every alive theme and use case as flattened rows, in display
/// order. The result can be uploaded again unchanged.
#[utoipa::path(
    get,
    path = "/v1/prompts/bulk",
    tag = "prompts",
    responses(
        (status = 200, description = "All prompts", body = PrebuiltPromptsResponse),
        (status = 403, description = "Missing or invalid auth token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
        (status = 503, description = "Database busy, retry later", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn bulk_get_prompts<D: Database>(
    State(state): State<AppState<D>>,
) -> Result<Json<PrebuiltPromptsResponse>, HandlerError> {
    let prompts = state.engine().export().await.map_err(sync_error)?;

    Ok(Json(PrebuiltPromptsResponse {
        prompts: prompts.into_iter().map(PrebuiltPromptDto::from).collect(),
    }))
}

/// Upload all prompts
///
/// Makes the catalogue match the submitted rows exactly. Themes and use
/// cases keep their uuid across uploads; anything not submitted is
/// soft-deleted and comes back with its old uuid if uploaded again.
#[utoipa::path(
    post,
    path = "/v1/prompts/bulk",
    tag = "prompts",
    request_body = Vec<PrebuiltPromptDto>,
    responses(
        (status = 200, description = "Catalogue reconciled", body = SyncSummaryResponse),
        (status = 400, description = "Invalid or conflicting rows", body = ErrorResponse),
        (status = 403, description = "Missing or invalid auth token", body = ErrorResponse),
        (status = 409, description = "Rows collide with a stored identity", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
        (status = 503, description = "Timed out or database busy, retry later", body = ErrorResponse)
    )
)]
#[instrument(skip(state, rows), fields(rows = rows.len()))]
pub async fn bulk_upload_prompts<D: Database>(
    State(state): State<AppState<D>>,
    Json(rows): Json<Vec<PrebuiltPromptDto>>,
) -> Result<Json<SyncSummaryResponse>, HandlerError> {
    let rows: Vec<PrebuiltPrompt> = rows.into_iter().map(PrebuiltPrompt::from).collect();

    let summary = state.engine().reconcile(&rows).await.map_err(sync_error)?;

    Ok(Json(summary.into()))
}
