//! Mod service for modhub.
//!
//! Ties the database and the file store together:
//! - Upload: duplicate check, file writes, row insert, cleanup on failure
//! - Listing of all mods
//! - Download of a mod file by id

use std::path::PathBuf;

use tracing::{info, warn};

use crate::db::{Database, Mod, ModRepository, NewMod};
use crate::{ModHubError, Result};

use super::storage::{FileKind, FileStorage};
use super::is_safe_id;

/// Request data for a mod upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub id: String,
    pub title: String,
    pub version: String,
    /// Thumbnail image bytes.
    pub thumbnail: Vec<u8>,
    /// Mod package bytes.
    pub file: Vec<u8>,
}

impl UploadRequest {
    /// Create a new upload request.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        version: impl Into<String>,
        thumbnail: Vec<u8>,
        file: Vec<u8>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            version: version.into(),
            thumbnail,
            file,
        }
    }
}

/// Result of a mod download.
#[derive(Debug)]
pub struct DownloadResult {
    /// The mod row.
    pub record: Mod,
    /// Mod file content.
    pub content: Vec<u8>,
}

/// Service for uploading, listing and downloading mods.
pub struct ModService<'a> {
    db: &'a Database,
    storage: &'a FileStorage,
}

impl<'a> ModService<'a> {
    /// Create a new ModService.
    pub fn new(db: &'a Database, storage: &'a FileStorage) -> Self {
        Self { db, storage }
    }

    fn repo(&self) -> ModRepository<'a> {
        ModRepository::new(self.db.pool())
    }

    /// Create the `mods` table if it does not exist yet.
    pub async fn setup(&self) -> Result<()> {
        self.repo().setup().await
    }

    /// Upload a mod.
    ///
    /// Both files are staged first; the row is inserted and the files are
    /// promoted to their final names inside one transaction, so the row
    /// becomes visible together with its files. An existing id is rejected
    /// before anything is written. On any failure the files written by this
    /// call are removed again.
    pub async fn upload(&self, request: &UploadRequest) -> Result<Mod> {
        if !is_safe_id(&request.id) {
            return Err(ModHubError::Validation(format!(
                "invalid mod id '{}'",
                request.id.escape_debug()
            )));
        }

        let repo = self.repo();
        if repo.exists(&request.id).await? {
            return Err(ModHubError::Duplicate(request.id.clone()));
        }

        let mut written = Vec::new();
        match self.persist(request, &mut written).await {
            Ok(record) => {
                info!(
                    id = %record.id,
                    version = %record.version,
                    size = request.file.len(),
                    "Mod uploaded"
                );
                Ok(record)
            }
            Err(e) => {
                self.remove_all(&written).await;
                Err(e)
            }
        }
    }

    async fn persist(&self, request: &UploadRequest, written: &mut Vec<PathBuf>) -> Result<Mod> {
        let id = request.id.as_str();

        let staged_thumbnail = self
            .storage
            .stage(id, FileKind::Thumbnail, &request.thumbnail)
            .await?;
        written.push(staged_thumbnail.clone());

        let staged_file = self.storage.stage(id, FileKind::Mod, &request.file).await?;
        written.push(staged_file.clone());

        let new_mod = NewMod::new(
            id,
            &request.title,
            &request.version,
            request.thumbnail.clone(),
            self.storage.path_for(id, FileKind::Mod).to_string_lossy(),
        );

        // Holding the insert keeps every other upload of this id out until
        // commit, so only the winner ever promotes.
        let mut tx = self.db.begin().await?;
        ModRepository::insert_in(&mut *tx, &new_mod).await?;

        for (staged, kind) in [
            (&staged_thumbnail, FileKind::Thumbnail),
            (&staged_file, FileKind::Mod),
        ] {
            let path = self.storage.promote(staged, id, kind).await?;
            written.push(path);
        }

        tx.commit().await?;

        Ok(new_mod.into())
    }

    async fn remove_all(&self, paths: &[PathBuf]) {
        for path in paths {
            if let Err(e) = self.storage.delete(path).await {
                warn!(path = %path.display(), error = %e, "Failed to remove file of failed upload");
            }
        }
    }

    /// List all mods.
    pub async fn list(&self) -> Result<Vec<Mod>> {
        self.repo().list_all().await
    }

    /// Download a mod file by id.
    ///
    /// Fails with [`ModHubError::NotFound`] if the id is unknown or the
    /// recorded file is gone.
    pub async fn download(&self, id: &str) -> Result<DownloadResult> {
        let record = self
            .repo()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ModHubError::NotFound(format!("mod '{id}'")))?;

        let content = self.storage.read(&record.file_path).await?;

        Ok(DownloadResult { record, content })
    }
}
