//! File store for modhub.
//!
//! Uploaded thumbnails and mod packages live on disk under a configured root,
//! named after the mod id. The database only records the mod file path.

mod service;
mod storage;

pub use service::{DownloadResult, ModService, UploadRequest};
pub use storage::{FileKind, FileStorage};

/// Maximum length of a mod id (in characters).
pub const MAX_ID_LENGTH: usize = 128;

/// Check that a mod id can be used as a file name.
///
/// Allowed: ASCII letters, digits, `-`, `_` and `.`, at most
/// [`MAX_ID_LENGTH`] characters, and not `.` or `..`.
pub fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LENGTH
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
