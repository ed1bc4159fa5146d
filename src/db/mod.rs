//! Database module for modhub.
//!
//! This module provides SQLite connectivity through an sqlx pool and the
//! repository for mod rows.

mod mods;
mod repository;
mod schema;

pub use mods::{Mod, NewMod};
pub use repository::ModRepository;
pub use schema::CREATE_MODS_TABLE;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info};

use crate::{ModHubError, Result};

/// Connection pool type used by repositories.
pub type DbPool = SqlitePool;

/// Maximum pooled connections for file-backed databases.
const MAX_CONNECTIONS: u32 = 5;

/// Database wrapper owning the connection pool.
///
/// Cloning is not needed: share it behind an `Arc` and hand `pool()` to
/// repositories for the duration of a call.
#[derive(Debug)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open (or create) the SQLite database at the specified path.
    ///
    /// The `mods` table is not created here; call [`ModRepository::setup`].
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening database at {:?}", path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .map_err(|e| ModHubError::DatabaseConnection(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Open an in-memory database for testing.
    ///
    /// Every connection to `:memory:` is a separate database, so the pool is
    /// pinned to a single connection that never expires.
    pub async fn open_in_memory() -> Result<Self> {
        debug!("Opening in-memory database");
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| ModHubError::DatabaseConnection(e.to_string()))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| ModHubError::DatabaseConnection(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Begin a transaction. Dropping it without `commit` rolls back.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    /// Close all pooled connections. Later queries fail with a connection error.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Check whether a table exists.
    pub async fn table_exists(&self, table_name: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = $1)",
        )
        .bind(table_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_in_memory() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(!db.table_exists("mods").await.unwrap());
    }

    #[tokio::test]
    async fn test_open_creates_file_and_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("mods.db");

        let db = Database::open(&path).await.unwrap();
        ModRepository::new(db.pool()).setup().await.unwrap();

        assert!(path.exists());
        assert!(db.table_exists("mods").await.unwrap());
    }

    #[tokio::test]
    async fn test_reopen_keeps_data() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mods.db");

        {
            let db = Database::open(&path).await.unwrap();
            let repo = ModRepository::new(db.pool());
            repo.setup().await.unwrap();
            repo.insert(&NewMod::new("m1", "Mod", "1.0", vec![1], "mods/m1.gz"))
                .await
                .unwrap();
            db.close().await;
        }

        let db = Database::open(&path).await.unwrap();
        let found = ModRepository::new(db.pool()).get_by_id("m1").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_query_after_close_fails() {
        let db = Database::open_in_memory().await.unwrap();
        db.close().await;

        let result = ModRepository::new(db.pool()).setup().await;
        assert!(matches!(result, Err(ModHubError::DatabaseConnection(_))));
    }
}
