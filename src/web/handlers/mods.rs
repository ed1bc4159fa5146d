//! Mod handlers: setup, upload, metadata listing and download.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, Path, State,
    },
    http::{header, StatusCode},
    response::Response,
    Json,
};
use validator::Validate;

use crate::web::dto::{ModMetadata, UploadFields};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Content-Disposition header value for a stored mod file.
///
/// Stored names are built from validated ids, so they never need quoting.
fn content_disposition_header(filename: &str) -> String {
    format!("attachment; filename=\"{}\"", filename)
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("Upload rejected: {}", e);
        return ApiError::payload_too_large("Upload exceeds the maximum allowed size");
    }
    tracing::warn!("Failed to read multipart field: {}", e);
    ApiError::bad_request("Invalid multipart data")
}

/// GET /setup - Create the mods table if needed.
#[utoipa::path(
    get,
    path = "/setup",
    tag = "mods",
    responses(
        (status = 200, description = "Table exists"),
        (status = 500, description = "Database unreachable")
    )
)]
pub async fn setup(State(state): State<Arc<AppState>>) -> Result<StatusCode, ApiError> {
    state.service().setup().await?;
    tracing::info!("Database setup completed");
    Ok(StatusCode::OK)
}

/// POST /upload - Upload a mod.
///
/// Request body: multipart/form-data with text fields `id`, `title`,
/// `version` and file fields `thumbnail`, `file`.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "mods",
    responses(
        (status = 200, description = "Mod stored"),
        (status = 400, description = "Missing or invalid fields"),
        (status = 409, description = "A mod with this id already exists"),
        (status = 413, description = "Upload too large"),
        (status = 500, description = "File store or database failure")
    )
)]
pub async fn upload_mod(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<StatusCode, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::warn!("Rejected upload request: {}", e);
        ApiError::bad_request("Expected multipart/form-data")
    })?;

    let mut fields = UploadFields::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "thumbnail" => {
                fields.thumbnail = Some(field.bytes().await.map_err(multipart_error)?.to_vec());
            }
            "file" => {
                fields.file = Some(field.bytes().await.map_err(multipart_error)?.to_vec());
            }
            text if UploadFields::TEXT_FIELDS.contains(&text) => {
                let bytes = field.bytes().await.map_err(multipart_error)?;
                fields.set_text(text, String::from_utf8_lossy(&bytes).into_owned());
            }
            _ => {}
        }
    }

    let form = fields.into_form()?;
    form.validate().map_err(ApiError::from_validation_errors)?;

    state.service().upload(&form.into()).await?;

    Ok(StatusCode::OK)
}

/// GET /metadata - List all mods.
#[utoipa::path(
    get,
    path = "/metadata",
    tag = "mods",
    responses(
        (status = 200, description = "All mods", body = Vec<ModMetadata>),
        (status = 500, description = "Database failure")
    )
)]
pub async fn list_metadata(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ModMetadata>>, ApiError> {
    let mods = state.service().list().await?;
    Ok(Json(mods.into_iter().map(ModMetadata::from).collect()))
}

/// GET /download/:id - Download a mod file.
#[utoipa::path(
    get,
    path = "/download/{id}",
    tag = "mods",
    params(
        ("id" = String, Path, description = "Mod id")
    ),
    responses(
        (status = 200, description = "Mod file content", content_type = "application/octet-stream"),
        (status = 404, description = "Unknown id or file missing"),
        (status = 500, description = "Read failure")
    )
)]
pub async fn download_mod(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response<Body>, ApiError> {
    let download = state.service().download(&id).await?;

    let stored = FsPath::new(&download.record.file_path);
    let content_type = mime_guess::from_path(stored)
        .first_or_octet_stream()
        .to_string();
    let filename = stored
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| id.clone());

    tracing::info!(id = %id, size = download.content.len(), "Mod downloaded");

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&filename),
        )
        .header(header::CONTENT_LENGTH, download.content.len())
        .body(Body::from(download.content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_header() {
        let result = content_disposition_header("test-mod-1.gz");
        assert_eq!(result, "attachment; filename=\"test-mod-1.gz\"");
    }
}
