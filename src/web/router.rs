//! Router configuration for the HTTP API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::dto::ModMetadata;
use super::handlers::{self, download_mod, list_metadata, setup, upload_mod, AppState};
use super::middleware::create_cors_layer;

/// OpenAPI description of the mod routes.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::mods::setup,
        handlers::mods::upload_mod,
        handlers::mods::list_metadata,
        handlers::mods::download_mod
    ),
    components(schemas(ModMetadata)),
    tags((name = "mods", description = "Mod upload, listing and download"))
)]
pub struct ApiDoc;

/// Create the main API router.
///
/// `max_upload_size` caps request bodies in bytes; multipart reads past it
/// fail with 413.
pub fn create_router(
    app_state: Arc<AppState>,
    cors_origins: &[String],
    max_upload_size: usize,
) -> Router {
    let mod_routes = Router::new()
        .route("/setup", get(setup))
        .route("/upload", post(upload_mod))
        .route("/metadata", get(list_metadata))
        .route("/download/:id", get(download_mod))
        .layer(DefaultBodyLimit::max(max_upload_size));

    Router::new()
        .merge(mod_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Create the Swagger UI router serving the OpenAPI document.
pub fn create_swagger_router() -> Router {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_health_router() {
        let _router = create_health_router();
    }

    #[test]
    fn test_openapi_lists_mod_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in ["/setup", "/upload", "/metadata", "/download/{id}"] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected} in {paths:?}"
            );
        }
    }
}
