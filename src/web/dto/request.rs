//! Request DTOs for the upload endpoint.

use std::collections::HashMap;

use validator::Validate;

use super::validation::{safe_mod_id, single_line_text};
use crate::file::{UploadRequest, MAX_ID_LENGTH};
use crate::web::error::ApiError;

/// Maximum title length (in characters).
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum version length (in characters).
pub const MAX_VERSION_LENGTH: usize = 64;

// `validator`'s `length` attribute takes `u64` bounds.
const MAX_ID_LENGTH_U64: u64 = MAX_ID_LENGTH as u64;
const MAX_TITLE_LENGTH_U64: u64 = MAX_TITLE_LENGTH as u64;
const MAX_VERSION_LENGTH_U64: u64 = MAX_VERSION_LENGTH as u64;

/// Multipart fields collected from an upload request.
///
/// Every field is optional until [`UploadFields::into_form`] checks presence.
#[derive(Debug, Default)]
pub struct UploadFields {
    pub id: Option<String>,
    pub title: Option<String>,
    pub version: Option<String>,
    pub thumbnail: Option<Vec<u8>>,
    pub file: Option<Vec<u8>>,
}

impl UploadFields {
    /// Names of the multipart fields read from text parts.
    pub const TEXT_FIELDS: [&'static str; 3] = ["id", "title", "version"];

    /// Store a text field by name. Unknown names are ignored.
    pub fn set_text(&mut self, name: &str, value: String) {
        match name {
            "id" => self.id = Some(value),
            "title" => self.title = Some(value),
            "version" => self.version = Some(value),
            _ => {}
        }
    }

    /// Check that every field was sent.
    ///
    /// Missing fields are reported together as a 400 with per-field details.
    pub fn into_form(self) -> Result<UploadForm, ApiError> {
        let mut missing: HashMap<String, Vec<String>> = HashMap::new();
        let mut require = |name: &str, present: bool| {
            if !present {
                missing.insert(name.to_string(), vec!["Field is required".to_string()]);
            }
        };
        require("id", self.id.is_some());
        require("title", self.title.is_some());
        require("version", self.version.is_some());
        require("thumbnail", self.thumbnail.is_some());
        require("file", self.file.is_some());

        match (self.id, self.title, self.version, self.thumbnail, self.file) {
            (Some(id), Some(title), Some(version), Some(thumbnail), Some(file)) => {
                Ok(UploadForm {
                    id,
                    title,
                    version,
                    thumbnail,
                    file,
                })
            }
            _ => Err(ApiError::invalid_fields(missing)),
        }
    }
}

/// A complete upload, ready for validation.
#[derive(Debug, Validate)]
pub struct UploadForm {
    #[validate(
        length(max = MAX_ID_LENGTH_U64, message = "Must be at most 128 characters"),
        custom(function = "safe_mod_id")
    )]
    pub id: String,
    #[validate(
        length(max = MAX_TITLE_LENGTH_U64, message = "Must be at most 200 characters"),
        custom(function = "single_line_text")
    )]
    pub title: String,
    #[validate(
        length(max = MAX_VERSION_LENGTH_U64, message = "Must be at most 64 characters"),
        custom(function = "single_line_text")
    )]
    pub version: String,
    pub thumbnail: Vec<u8>,
    pub file: Vec<u8>,
}

impl From<UploadForm> for UploadRequest {
    fn from(form: UploadForm) -> Self {
        UploadRequest::new(form.id, form.title, form.version, form.thumbnail, form.file)
    }
}
