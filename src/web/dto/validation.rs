//! Custom validators for upload fields.

use validator::ValidationError;

use crate::file::is_safe_id;

/// Validate that a mod id is usable as a stored file name.
pub fn safe_mod_id(value: &str) -> Result<(), ValidationError> {
    if !is_safe_id(value) {
        return Err(ValidationError::new("safe_mod_id").with_message(
            "Must contain only letters, digits, '-', '_' or '.'".into(),
        ));
    }
    Ok(())
}

/// Validate a single-line text field: not blank, no control characters.
pub fn single_line_text(value: &str) -> Result<(), ValidationError> {
    not_empty_trimmed(value)?;
    no_control_chars(value)
}

/// Validate that a string does not contain control characters or NULL bytes.
pub fn no_control_chars(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(|c| c.is_control()) {
        return Err(ValidationError::new("no_control_chars")
            .with_message("Must not contain control characters".into()));
    }
    Ok(())
}

/// Validate that a string is not empty after trimming whitespace.
pub fn not_empty_trimmed(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_empty_trimmed")
            .with_message("Must not be empty".into()));
    }
    Ok(())
}
