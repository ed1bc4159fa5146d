//! API handlers.

pub mod mods;

pub use mods::*;

use std::sync::Arc;

use crate::file::{FileStorage, ModService};
use crate::Database;

/// Application state shared across handlers.
///
/// Built once at startup and handed to the router; handlers never reach for
/// globals.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database handle (pool inside).
    pub db: Arc<Database>,
    /// File store for thumbnails and mod files.
    pub storage: FileStorage,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Arc<Database>, storage: FileStorage) -> Self {
        Self { db, storage }
    }

    /// Service bound to this state's database and file store.
    pub fn service(&self) -> ModService<'_> {
        ModService::new(&self.db, &self.storage)
    }
}
