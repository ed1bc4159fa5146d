//! Database schema for modhub.

/// DDL for the `mods` table.
///
/// `IF NOT EXISTS` keeps setup idempotent. `thumbnail` holds the raw image
/// bytes; `file_path` points into the file store.
pub const CREATE_MODS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS mods (
    id          TEXT PRIMARY KEY,
    title       TEXT NOT NULL,
    version     TEXT NOT NULL,
    thumbnail   BLOB NOT NULL,
    file_path   TEXT NOT NULL
)
"#;
