//! Mod repository for modhub.
//!
//! This module provides the create/read operations for mod rows.

use sqlx::SqliteConnection;
use tracing::debug;

use super::mods::{Mod, NewMod};
use super::schema::CREATE_MODS_TABLE;
use super::DbPool;
use crate::{ModHubError, Result};

/// Repository for mod rows.
pub struct ModRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ModRepository<'a> {
    /// Create a new ModRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Ensure the `mods` table exists. Safe to call any number of times.
    pub async fn setup(&self) -> Result<()> {
        sqlx::query(CREATE_MODS_TABLE).execute(self.pool).await?;
        debug!("mods table ready");
        Ok(())
    }

    /// Insert a new mod.
    ///
    /// Fails with [`ModHubError::Duplicate`] if the id is already taken.
    pub async fn insert(&self, new_mod: &NewMod) -> Result<Mod> {
        {
            let mut conn = self.pool.acquire().await?;
            Self::insert_in(&mut *conn, new_mod).await?;
        }

        self.get_by_id(&new_mod.id)
            .await?
            .ok_or_else(|| ModHubError::NotFound(format!("mod '{}'", new_mod.id)))
    }

    /// Insert a new mod on an existing connection or open transaction.
    ///
    /// Fails with [`ModHubError::Duplicate`] if the id is already taken.
    pub async fn insert_in(conn: &mut SqliteConnection, new_mod: &NewMod) -> Result<()> {
        sqlx::query(
            "INSERT INTO mods (id, title, version, thumbnail, file_path)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&new_mod.id)
        .bind(&new_mod.title)
        .bind(&new_mod.version)
        .bind(&new_mod.thumbnail)
        .bind(&new_mod.file_path)
        .execute(&mut *conn)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                ModHubError::Duplicate(new_mod.id.clone())
            }
            other => other.into(),
        })?;

        Ok(())
    }

    /// Get a mod by id.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<Mod>> {
        let result = sqlx::query_as::<_, Mod>(
            "SELECT id, title, version, thumbnail, file_path FROM mods WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// List all mods in insertion order.
    pub async fn list_all(&self) -> Result<Vec<Mod>> {
        let mods = sqlx::query_as::<_, Mod>(
            "SELECT id, title, version, thumbnail, file_path FROM mods ORDER BY rowid",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(mods)
    }

    /// Check whether a mod with the given id exists.
    pub async fn exists(&self, id: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM mods WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(exists)
    }
}
