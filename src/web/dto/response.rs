//! Response DTOs for the metadata endpoint.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::Mod;

/// Metadata of one mod as returned by `GET /metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ModMetadata {
    pub id: String,
    pub title: String,
    pub version: String,
    /// Thumbnail bytes, base64 encoded (standard alphabet, padded).
    pub thumbnail: String,
    /// Path of the stored mod file.
    pub file_path: String,
}

impl From<Mod> for ModMetadata {
    fn from(record: Mod) -> Self {
        Self {
            thumbnail: STANDARD.encode(&record.thumbnail),
            id: record.id,
            title: record.title,
            version: record.version,
            file_path: record.file_path,
        }
    }
}
