//! API route configuration.

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::{delete, get, post, put};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::auth::{AuthConfig, require_auth_token};
use super::handlers::{self, HealthResponse};
use super::state::AppState;
use super::v1::{
    self, CreateUseCaseRequest, EntityCountsResponse, ErrorResponse, PrebuiltPromptDto,
    PrebuiltPromptsResponse, SyncSummaryResponse, ThemeRequest, ThemeResponse, ThemesResponse,
    UpdateUseCaseRequest, UseCaseResponse, UseCasesResponse,
};
use crate::db::Database;

/// Build routes with generic database type.
///
/// This macro reduces boilerplate when registering handlers that are generic
/// over the Database trait. It applies the turbofish operator automatically.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Prompt Catalog API",
        version = "0.3.0",
        description = "Prebuilt prompt themes and use cases with bulk synchronization",
        license(name = "GPL-2.0")
    ),
    paths(
        handlers::health,
        v1::bulk_get_prompts,
        v1::bulk_upload_prompts,
        v1::list_themes,
        v1::get_theme,
        v1::create_theme,
        v1::update_theme,
        v1::delete_theme,
        v1::list_use_cases,
        v1::create_use_case,
        v1::get_theme_use_case,
        v1::get_use_case,
        v1::update_use_case,
        v1::delete_use_case,
    ),
    components(
        schemas(
            HealthResponse,
            PrebuiltPromptDto,
            PrebuiltPromptsResponse,
            EntityCountsResponse,
            SyncSummaryResponse,
            ThemeResponse,
            ThemesResponse,
            ThemeRequest,
            UseCaseResponse,
            UseCasesResponse,
            CreateUseCaseRequest,
            UpdateUseCaseRequest,
            ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "prompts", description = "Bulk prompt upload and download"),
        (name = "themes", description = "Theme management endpoints"),
        (name = "use-cases", description = "Use case management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the API router with OpenAPI documentation.
///
/// Everything under `/v1` passes through the auth-token check; `/health`
/// and `/docs` are public.
pub fn create_router<D: Database>(state: AppState<D>, auth: AuthConfig) -> Router {
    let api = ApiDoc::openapi();

    // System routes (non-generic)
    let system_routes = Router::new().route("/health", get(handlers::health));

    let prompt_routes = routes!(D => {
        get "/prompts/bulk" => v1::bulk_get_prompts,
        post "/prompts/bulk" => v1::bulk_upload_prompts,
    });

    let theme_routes = routes!(D => {
        get "/prompts/themes" => v1::list_themes,
        post "/prompts/themes" => v1::create_theme,
        get "/prompts/themes/{theme_uuid}" => v1::get_theme,
        put "/prompts/themes/{theme_uuid}" => v1::update_theme,
        delete "/prompts/themes/{theme_uuid}" => v1::delete_theme,
    });

    let use_case_routes = routes!(D => {
        get "/prompts/themes/{theme_uuid}/use-cases" => v1::list_use_cases,
        post "/prompts/themes/{theme_uuid}/use-cases" => v1::create_use_case,
        get "/prompts/themes/{theme_uuid}/use-cases/{use_case_uuid}" => v1::get_theme_use_case,
        put "/prompts/themes/{theme_uuid}/use-cases/{use_case_uuid}" => v1::update_use_case,
        delete "/prompts/themes/{theme_uuid}/use-cases/{use_case_uuid}" => v1::delete_use_case,
        get "/prompts/use-cases/{use_case_uuid}" => v1::get_use_case,
    });

    let v1_routes = prompt_routes
        .merge(theme_routes)
        .merge(use_case_routes)
        .route_layer(middleware::from_fn_with_state(
            Arc::new(auth),
            require_auth_token,
        ));

    system_routes
        .nest("/v1", v1_routes)
        .merge(Scalar::with_url("/docs", api))
        .with_state(state)
}
