//! File storage for modhub.
//!
//! Physical persistence of uploaded thumbnails and mod files, keyed by mod id:
//! ```text
//! {base_path}/
//! ├── mods/
//! │   ├── {id}.gz
//! │   └── .{id}.gz.{pid}-{seq}.part   (staged, not yet promoted)
//! └── thumbnails/
//!     └── {id}.png
//! ```
//!
//! Uploads are written to a staged file first and renamed onto the final
//! name with [`FileStorage::promote`], so a half-written upload never shows
//! up under `{id}.{ext}`.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::{ModHubError, Result};

/// Suffix of staged files.
const STAGED_SUFFIX: &str = "part";

static STAGE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Kind of content stored for a mod.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// The downloadable mod package.
    Mod,
    /// The preview image.
    Thumbnail,
}

impl FileKind {
    /// Subdirectory holding files of this kind.
    pub fn dir_name(&self) -> &'static str {
        match self {
            FileKind::Mod => "mods",
            FileKind::Thumbnail => "thumbnails",
        }
    }

    /// Extension given to stored files of this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Mod => "gz",
            FileKind::Thumbnail => "png",
        }
    }
}

/// File storage rooted at a base directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage with the given base path.
    ///
    /// The base directory and the per-kind subdirectories are created if missing.
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        for kind in [FileKind::Mod, FileKind::Thumbnail] {
            fs::create_dir_all(base_path.join(kind.dir_name())).await?;
        }

        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path where content of `kind` for mod `id` is stored.
    pub fn path_for(&self, id: &str, kind: FileKind) -> PathBuf {
        self.base_path
            .join(kind.dir_name())
            .join(format!("{id}.{}", kind.extension()))
    }

    fn staged_path_for(&self, id: &str, kind: FileKind) -> PathBuf {
        let seq = STAGE_SEQ.fetch_add(1, Ordering::Relaxed);
        self.base_path.join(kind.dir_name()).join(format!(
            ".{id}.{}.{}-{seq}.{STAGED_SUFFIX}",
            kind.extension(),
            std::process::id()
        ))
    }

    /// Write content to a fresh staged file and return its path.
    ///
    /// Every call gets its own file, so concurrent uploads of one id never
    /// write to the same path. The staged file is removed if the write fails.
    pub async fn stage(&self, id: &str, kind: FileKind, content: &[u8]) -> Result<PathBuf> {
        let path = self.staged_path_for(id, kind);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        if let Err(e) = write_all_synced(&mut file, content).await {
            drop(file);
            let _ = fs::remove_file(&path).await;
            return Err(e.into());
        }

        Ok(path)
    }

    /// Move a staged file onto its final name and return the final path.
    ///
    /// A file already at the final name has no row behind it (callers
    /// promote only while holding the insert for `id`), so it is replaced.
    pub async fn promote(&self, staged: &Path, id: &str, kind: FileKind) -> Result<PathBuf> {
        let path = self.path_for(id, kind);

        if self.exists(&path).await {
            warn!(path = %path.display(), "Replacing stale file left by an earlier upload");
        }
        fs::rename(staged, &path).await?;

        Ok(path)
    }

    /// Read the full content of a stored file.
    pub async fn read(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = path.as_ref();

        match fs::read(path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ModHubError::NotFound(format!("File: {}", path.display())))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a stored file.
    ///
    /// Returns `true` if the file was deleted, `false` if it didn't exist.
    pub async fn delete(&self, path: impl AsRef<Path>) -> Result<bool> {
        match fs::remove_file(path.as_ref()).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a file exists.
    pub async fn exists(&self, path: impl AsRef<Path>) -> bool {
        fs::try_exists(path.as_ref()).await.unwrap_or(false)
    }
}

async fn write_all_synced(file: &mut fs::File, content: &[u8]) -> io::Result<()> {
    file.write_all(content).await?;
    file.flush().await?;
    file.sync_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn setup_storage() -> (TempDir, FileStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path()).await.unwrap();
        (temp_dir, storage)
    }

    async fn store(storage: &FileStorage, id: &str, kind: FileKind, content: &[u8]) -> PathBuf {
        let staged = storage.stage(id, kind, content).await.unwrap();
        storage.promote(&staged, id, kind).await.unwrap()
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_new_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("storage");

        let storage = FileStorage::new(&root).await.unwrap();

        assert_eq!(storage.base_path(), root);
        assert!(root.join("mods").is_dir());
        assert!(root.join("thumbnails").is_dir());
    }

    #[tokio::test]
    async fn test_path_for_is_deterministic() {
        let (_temp_dir, storage) = setup_storage().await;

        assert_eq!(
            storage.path_for("m1", FileKind::Mod),
            storage.base_path().join("mods").join("m1.gz")
        );
        assert_eq!(
            storage.path_for("m1", FileKind::Thumbnail),
            storage.base_path().join("thumbnails").join("m1.png")
        );
    }

    #[tokio::test]
    async fn test_stage_does_not_touch_final_path() {
        let (_temp_dir, storage) = setup_storage().await;

        let staged = storage.stage("m1", FileKind::Mod, b"content").await.unwrap();

        assert_ne!(staged, storage.path_for("m1", FileKind::Mod));
        assert!(!storage.exists(storage.path_for("m1", FileKind::Mod)).await);
        assert_eq!(storage.read(&staged).await.unwrap(), b"content");
    }

    #[tokio::test]
    async fn test_stage_paths_are_unique_per_call() {
        let (_temp_dir, storage) = setup_storage().await;

        let first = storage.stage("m1", FileKind::Mod, b"first").await.unwrap();
        let second = storage.stage("m1", FileKind::Mod, b"second").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(storage.read(&first).await.unwrap(), b"first");
        assert_eq!(storage.read(&second).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_stage_and_promote() {
        let (_temp_dir, storage) = setup_storage().await;
        let content: Vec<u8> = (0..=255).collect();

        let path = store(&storage, "m1", FileKind::Mod, &content).await;

        assert_eq!(path, storage.path_for("m1", FileKind::Mod));
        assert_eq!(storage.read(&path).await.unwrap(), content);
        assert_eq!(entries(&storage.base_path().join("mods")), vec!["m1.gz"]);
    }

    #[tokio::test]
    async fn test_promote_replaces_stale_file() {
        let (_temp_dir, storage) = setup_storage().await;
        let stale = storage.path_for("m1", FileKind::Mod);
        std::fs::write(&stale, b"left behind").unwrap();

        let path = store(&storage, "m1", FileKind::Mod, b"fresh").await;

        assert_eq!(path, stale);
        assert_eq!(storage.read(&path).await.unwrap(), b"fresh");
        assert_eq!(entries(&storage.base_path().join("mods")), vec!["m1.gz"]);
    }

    #[tokio::test]
    async fn test_stage_recreates_missing_kind_dir() {
        let (_temp_dir, storage) = setup_storage().await;
        std::fs::remove_dir(storage.base_path().join("thumbnails")).unwrap();

        let path = store(&storage, "m1", FileKind::Thumbnail, b"img").await;

        assert!(storage.exists(&path).await);
    }

    #[tokio::test]
    async fn test_kinds_do_not_collide() {
        let (_temp_dir, storage) = setup_storage().await;

        let mod_path = store(&storage, "m1", FileKind::Mod, b"mod").await;
        let thumb_path = store(&storage, "m1", FileKind::Thumbnail, b"thumb").await;

        assert_ne!(mod_path, thumb_path);
        assert_eq!(storage.read(&mod_path).await.unwrap(), b"mod");
        assert_eq!(storage.read(&thumb_path).await.unwrap(), b"thumb");
    }

    #[tokio::test]
    async fn test_read_not_found() {
        let (_temp_dir, storage) = setup_storage().await;

        let result = storage.read(storage.path_for("nope", FileKind::Mod)).await;

        assert!(matches!(result, Err(ModHubError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_read_directory_is_io_error() {
        let (_temp_dir, storage) = setup_storage().await;

        let result = storage.read(storage.base_path().join("mods")).await;

        assert!(matches!(result, Err(ModHubError::Io(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let (_temp_dir, storage) = setup_storage().await;
        let path = store(&storage, "m1", FileKind::Mod, b"x").await;

        assert!(storage.delete(&path).await.unwrap());
        assert!(!storage.exists(&path).await);
        assert!(!storage.delete(&path).await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_content() {
        let (_temp_dir, storage) = setup_storage().await;

        let path = store(&storage, "empty", FileKind::Mod, b"").await;

        assert!(storage.read(&path).await.unwrap().is_empty());
    }
}
