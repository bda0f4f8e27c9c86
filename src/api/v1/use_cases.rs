//! Use case management handlers.
//!
//! Routes nested under a theme only see use cases that belong to it.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use super::{ErrorResponse, HandlerError, db_error, sync_error};
use crate::api::AppState;
use crate::db::{Database, DbError, UseCase, UseCaseInput, UseCaseRepository};

// =============================================================================
// DTOs (Data Transfer Objects)
// =============================================================================

/// Use case response DTO
#[derive(Serialize, ToSchema)]
pub struct UseCaseResponse {
    #[schema(example = "5d0c7a1e-2b3f-4c8d-8e9a-1f2b3c4d5e6f")]
    pub uuid: String,
    #[schema(example = "0b9f2e4a-5c1d-4e7f-9a3b-2d6c8e0f1a2b")]
    pub theme_uuid: String,
    #[schema(example = "Blog post")]
    pub title: String,
    #[schema(example = "Write a blog post about the topic below.")]
    pub instruction: String,
    #[schema(example = "Topic")]
    pub user_input_form: String,
    pub position: Option<i64>,
    #[schema(example = "2025-01-01 00:00:00")]
    pub created_at: String,
    #[schema(example = "2025-01-01 00:00:00")]
    pub updated_at: String,
}

impl From<UseCase> for UseCaseResponse {
    fn from(u: UseCase) -> Self {
        Self {
            uuid: u.uuid,
            theme_uuid: u.theme_uuid,
            title: u.title,
            instruction: u.instruction,
            user_input_form: u.user_input_form,
            position: u.position,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Use cases of one theme in display order
#[derive(Serialize, ToSchema)]
pub struct UseCasesResponse {
    pub theme_uuid: String,
    /// Title of the theme
    pub title: String,
    pub use_cases: Vec<UseCaseResponse>,
}

/// Create use case request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUseCaseRequest {
    #[schema(example = "Blog post")]
    pub title: String,
    #[schema(example = "Write a blog post about the topic below.")]
    pub instruction: String,
    #[schema(example = "Topic")]
    pub user_input_form: String,
    #[serde(default)]
    pub position: Option<i64>,
}

impl From<CreateUseCaseRequest> for UseCaseInput {
    fn from(r: CreateUseCaseRequest) -> Self {
        Self {
            title: r.title,
            instruction: r.instruction,
            user_input_form: r.user_input_form,
            position: r.position,
        }
    }
}

/// Update use case request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUseCaseRequest {
    pub title: String,
    pub instruction: String,
    pub user_input_form: String,
    #[serde(default)]
    pub position: Option<i64>,
    /// Move the use case to this theme; defaults to its current theme
    #[serde(default)]
    pub theme_uuid: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Fetch a use case and check it belongs to `theme_uuid`.
async fn owned_use_case<D: Database>(
    state: &AppState<D>,
    theme_uuid: &str,
    use_case_uuid: &str,
) -> Result<UseCase, HandlerError> {
    let use_case = state
        .engine()
        .get_use_case(use_case_uuid)
        .await
        .map_err(sync_error)?;

    if use_case.theme_uuid != theme_uuid {
        return Err(db_error(DbError::not_found("UseCase", use_case_uuid)));
    }
    Ok(use_case)
}

/// List use cases of a theme
#[utoipa::path(
    get,
    path = "/v1/prompts/themes/{theme_uuid}/use-cases",
    tag = "use-cases",
    params(
        ("theme_uuid" = String, Path, description = "Theme uuid")
    ),
    responses(
        (status = 200, description = "Use cases in display order", body = UseCasesResponse),
        (status = 404, description = "Theme not found or deleted", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_use_cases<D: Database>(
    State(state): State<AppState<D>>,
    Path(theme_uuid): Path<String>,
) -> Result<Json<UseCasesResponse>, HandlerError> {
    let (theme, use_cases) = state
        .engine()
        .theme_with_use_cases(&theme_uuid)
        .await
        .map_err(sync_error)?;

    Ok(Json(UseCasesResponse {
        theme_uuid: theme.uuid,
        title: theme.title,
        use_cases: use_cases.into_iter().map(UseCaseResponse::from).collect(),
    }))
}

/// Create a use case under a theme
///
/// Recreating a deleted use case with the same title, instruction and input
/// form revives it with its original uuid.
#[utoipa::path(
    post,
    path = "/v1/prompts/themes/{theme_uuid}/use-cases",
    tag = "use-cases",
    params(
        ("theme_uuid" = String, Path, description = "Theme uuid")
    ),
    request_body = CreateUseCaseRequest,
    responses(
        (status = 201, description = "Use case created or revived", body = UseCaseResponse),
        (status = 400, description = "Blank title or instruction", body = ErrorResponse),
        (status = 404, description = "Theme not found or deleted", body = ErrorResponse),
        (status = 503, description = "Database busy, retry later", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_use_case<D: Database>(
    State(state): State<AppState<D>>,
    Path(theme_uuid): Path<String>,
    Json(req): Json<CreateUseCaseRequest>,
) -> Result<(StatusCode, Json<UseCaseResponse>), HandlerError> {
    let use_case = state
        .db()
        .use_cases()
        .create_or_revive(&theme_uuid, &UseCaseInput::from(req))
        .await
        .map_err(db_error)?;

    info!(uuid = %use_case.uuid, theme_uuid = %theme_uuid, "Use case created");
    Ok((StatusCode::CREATED, Json(UseCaseResponse::from(use_case))))
}

/// Get a use case of a theme
#[utoipa::path(
    get,
    path = "/v1/prompts/themes/{theme_uuid}/use-cases/{use_case_uuid}",
    tag = "use-cases",
    params(
        ("theme_uuid" = String, Path, description = "Theme uuid"),
        ("use_case_uuid" = String, Path, description = "Use case uuid")
    ),
    responses(
        (status = 200, description = "Use case found", body = UseCaseResponse),
        (status = 404, description = "Not found, deleted, or in another theme", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_theme_use_case<D: Database>(
    State(state): State<AppState<D>>,
    Path((theme_uuid, use_case_uuid)): Path<(String, String)>,
) -> Result<Json<UseCaseResponse>, HandlerError> {
    let use_case = owned_use_case(&state, &theme_uuid, &use_case_uuid).await?;
    Ok(Json(UseCaseResponse::from(use_case)))
}

/// Get a use case by uuid
#[utoipa::path(
    get,
    path = "/v1/prompts/use-cases/{use_case_uuid}",
    tag = "use-cases",
    params(
        ("use_case_uuid" = String, Path, description = "Use case uuid")
    ),
    responses(
        (status = 200, description = "Use case found", body = UseCaseResponse),
        (status = 404, description = "Use case or its theme not found or deleted", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_use_case<D: Database>(
    State(state): State<AppState<D>>,
    Path(use_case_uuid): Path<String>,
) -> Result<Json<UseCaseResponse>, HandlerError> {
    let use_case = state
        .engine()
        .get_use_case(&use_case_uuid)
        .await
        .map_err(sync_error)?;

    Ok(Json(UseCaseResponse::from(use_case)))
}

/// Update a use case
#[utoipa::path(
    put,
    path = "/v1/prompts/themes/{theme_uuid}/use-cases/{use_case_uuid}",
    tag = "use-cases",
    params(
        ("theme_uuid" = String, Path, description = "Theme uuid"),
        ("use_case_uuid" = String, Path, description = "Use case uuid")
    ),
    request_body = UpdateUseCaseRequest,
    responses(
        (status = 200, description = "Use case updated", body = UseCaseResponse),
        (status = 404, description = "Use case or target theme not found", body = ErrorResponse),
        (status = 409, description = "Identity already used in the target theme", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_use_case<D: Database>(
    State(state): State<AppState<D>>,
    Path((theme_uuid, use_case_uuid)): Path<(String, String)>,
    Json(req): Json<UpdateUseCaseRequest>,
) -> Result<Json<UseCaseResponse>, HandlerError> {
    owned_use_case(&state, &theme_uuid, &use_case_uuid).await?;

    let target_theme = req.theme_uuid.unwrap_or(theme_uuid);
    let input = UseCaseInput {
        title: req.title,
        instruction: req.instruction,
        user_input_form: req.user_input_form,
        position: req.position,
    };

    let updated = state
        .db()
        .use_cases()
        .update(&use_case_uuid, &target_theme, &input)
        .await
        .map_err(db_error)?;

    Ok(Json(UseCaseResponse::from(updated)))
}

/// Delete a use case
#[utoipa::path(
    delete,
    path = "/v1/prompts/themes/{theme_uuid}/use-cases/{use_case_uuid}",
    tag = "use-cases",
    params(
        ("theme_uuid" = String, Path, description = "Theme uuid"),
        ("use_case_uuid" = String, Path, description = "Use case uuid")
    ),
    responses(
        (status = 204, description = "Use case deleted"),
        (status = 404, description = "Not found, deleted, or in another theme", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_use_case<D: Database>(
    State(state): State<AppState<D>>,
    Path((theme_uuid, use_case_uuid)): Path<(String, String)>,
) -> Result<StatusCode, HandlerError> {
    owned_use_case(&state, &theme_uuid, &use_case_uuid).await?;

    state
        .db()
        .use_cases()
        .soft_delete(&use_case_uuid)
        .await
        .map_err(db_error)?;

    info!(uuid = %use_case_uuid, "Use case deleted");
    Ok(StatusCode::NO_CONTENT)
}
