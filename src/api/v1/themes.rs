//! Theme management handlers.

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
use crate::db::{Database, Theme, ThemeInput, ThemeRepository};

// =============================================================================
// DTOs (Data Transfer Objects)
// =============================================================================

/// Theme response DTO
#[derive(Serialize, ToSchema)]
pub struct ThemeResponse {
    /// Stable identifier (UUID v4)
    #[schema(example = "0b9f2e4a-5c1d-4e7f-9a3b-2d6c8e0f1a2b")]
    pub uuid: String,
    #[schema(example = "Writing")]
    pub title: String,
    #[schema(example = "Drafts and edits")]
    pub subtitle: String,
    /// Explicit sort key; unpositioned themes sort last
    #[schema(example = 1)]
    pub position: Option<i64>,
    #[schema(example = "2025-01-01 00:00:00")]
    pub created_at: String,
    #[schema(example = "2025-01-01 00:00:00")]
    pub updated_at: String,
}

impl From<Theme> for ThemeResponse {
    fn from(t: Theme) -> Self {
        Self {
            uuid: t.uuid,
            title: t.title,
            subtitle: t.subtitle,
            position: t.position,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Themes in display order
#[derive(Serialize, ToSchema)]
pub struct ThemesResponse {
    pub themes: Vec<ThemeResponse>,
}

/// Create or update theme request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct ThemeRequest {
    #[schema(example = "Writing")]
    pub title: String,
    #[schema(example = "Drafts and edits")]
    pub subtitle: String,
    #[schema(example = 1)]
    #[serde(default)]
    pub position: Option<i64>,
}

impl From<ThemeRequest> for ThemeInput {
    fn from(r: ThemeRequest) -> Self {
        Self {
            title: r.title,
            subtitle: r.subtitle,
            position: r.position,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// List themes
///
/// Returns alive themes, positioned ones first
#[utoipa::path(
    get,
    path = "/v1/prompts/themes",
    tag = "themes",
    responses(
        (status = 200, description = "Themes in display order", body = ThemesResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_themes<D: Database>(
    State(state): State<AppState<D>>,
) -> Result<Json<ThemesResponse>, HandlerError> {
    let themes = state.engine().list_themes().await.map_err(sync_error)?;

    Ok(Json(ThemesResponse {
        themes: themes.into_iter().map(ThemeResponse::from).collect(),
    }))
}

/// Get a theme by uuid
#[utoipa::path(
    get,
    path = "/v1/prompts/themes/{theme_uuid}",
    tag = "themes",
    params(
        ("theme_uuid" = String, Path, description = "Theme uuid")
    ),
    responses(
        (status = 200, description = "Theme found", body = ThemeResponse),
        (status = 404, description = "Theme not found or deleted", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_theme<D: Database>(
    State(state): State<AppState<D>>,
    Path(theme_uuid): Path<String>,
) -> Result<Json<ThemeResponse>, HandlerError> {
    let theme = state
        .engine()
        .get_theme(&theme_uuid)
        .await
        .map_err(sync_error)?;

    Ok(Json(ThemeResponse::from(theme)))
}

/// Create a theme
///
/// Creating a theme whose title and subtitle match a deleted one revives it
/// with its original uuid.
#[utoipa::path(
    post,
    path = "/v1/prompts/themes",
    tag = "themes",
    request_body = ThemeRequest,
    responses(
        (status = 201, description = "Theme created or revived", body = ThemeResponse),
        (status = 400, description = "Blank title or subtitle", body = ErrorResponse),
        (status = 503, description = "Database busy, retry later", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_theme<D: Database>(
    State(state): State<AppState<D>>,
    Json(req): Json<ThemeRequest>,
) -> Result<(StatusCode, Json<ThemeResponse>), HandlerError> {
    let theme = state
        .db()
        .themes()
        .create_or_revive(&ThemeInput::from(req))
        .await
        .map_err(db_error)?;

    info!(uuid = %theme.uuid, "Theme created");
    Ok((StatusCode::CREATED, Json(ThemeResponse::from(theme))))
}

/// Update a theme
#[utoipa::path(
    put,
    path = "/v1/prompts/themes/{theme_uuid}",
    tag = "themes",
    params(
        ("theme_uuid" = String, Path, description = "Theme uuid")
    ),
    request_body = ThemeRequest,
    responses(
        (status = 200, description = "Theme updated", body = ThemeResponse),
        (status = 404, description = "Theme not found or deleted", body = ErrorResponse),
        (status = 409, description = "Another theme has this title and subtitle", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_theme<D: Database>(
    State(state): State<AppState<D>>,
    Path(theme_uuid): Path<String>,
    Json(req): Json<ThemeRequest>,
) -> Result<Json<ThemeResponse>, HandlerError> {
    let theme = state
        .db()
        .themes()
        .update(&theme_uuid, &ThemeInput::from(req))
        .await
        .map_err(db_error)?;

    Ok(Json(ThemeResponse::from(theme)))
}

/// Delete a theme
///
/// Soft-deletes the theme. Its use cases stay stored but are hidden while
/// the theme is deleted.
#[utoipa::path(
    delete,
    path = "/v1/prompts/themes/{theme_uuid}",
    tag = "themes",
    params(
        ("theme_uuid" = String, Path, description = "Theme uuid")
    ),
    responses(
        (status = 204, description = "Theme deleted"),
        (status = 404, description = "Theme not found or already deleted", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_theme<D: Database>(
    State(state): State<AppState<D>>,
    Path(theme_uuid): Path<String>,
) -> Result<StatusCode, HandlerError> {
    state
        .db()
        .themes()
        .soft_delete(&theme_uuid)
        .await
        .map_err(db_error)?;

    info!(uuid = %theme_uuid, "Theme deleted");
    Ok(StatusCode::NO_CONTENT)
}
