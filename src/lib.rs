//! modhub - mod package hosting service
//!
//! Upload mods (metadata, thumbnail, package file), list them and download
//! them by id over a small HTTP API backed by SQLite and the filesystem.

pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use db::{Database, Mod, ModRepository, NewMod};
pub use error::{ModHubError, Result};
pub use file::{FileKind, FileStorage, ModService, UploadRequest};
pub use web::{AppState, WebServer};
