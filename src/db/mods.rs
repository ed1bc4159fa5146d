//! Mod entity types.

/// A stored mod row.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Mod {
    /// Caller-supplied unique identifier.
    pub id: String,
    /// Display name.
    pub title: String,
    /// Free-form version string.
    pub version: String,
    /// Raw thumbnail bytes.
    pub thumbnail: Vec<u8>,
    /// Path of the stored mod file.
    pub file_path: String,
}

/// Data for inserting a new mod.
#[derive(Debug, Clone)]
pub struct NewMod {
    pub id: String,
    pub title: String,
    pub version: String,
    pub thumbnail: Vec<u8>,
    pub file_path: String,
}

impl NewMod {
    /// Create a new NewMod.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        version: impl Into<String>,
        thumbnail: impl Into<Vec<u8>>,
        file_path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            version: version.into(),
            thumbnail: thumbnail.into(),
            file_path: file_path.into(),
        }
    }
}

impl From<NewMod> for Mod {
    fn from(new_mod: NewMod) -> Self {
        Self {
            id: new_mod.id,
            title: new_mod.title,
            version: new_mod.version,
            thumbnail: new_mod.thumbnail,
            file_path: new_mod.file_path,
        }
    }
}
