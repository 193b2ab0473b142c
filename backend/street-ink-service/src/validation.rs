//! Input normalization shared by request DTOs.
//!
//! Incoming strings are trimmed and blank values become absent before any
//! rule runs, so a whitespace-only required field reads as missing.

use mime::Mime;

use crate::error::AppError;
use crate::storage::UploadedFile;

/// Image types accepted for posts, avatars and cover photos
pub const IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

pub fn trimmed(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let t = v.trim();
        if t.is_empty() {
            None
        } else if t.len() == v.len() {
            Some(v)
        } else {
            Some(t.to_string())
        }
    })
}

pub fn is_image(content_type: &Mime) -> bool {
    IMAGE_TYPES.contains(&content_type.essence_str())
}

/// Check an uploaded image's type and size.
pub fn check_image(
    field: &'static str,
    file: &UploadedFile,
    max_bytes: usize,
) -> Result<(), AppError> {
    if !is_image(&file.content_type) {
        return Err(AppError::invalid_field(
            field,
            "mimes",
            &format!("The {} must be a file of type: jpeg, png, gif, webp.", field.replace('_', " ")),
        ));
    }
    if file.len() > max_bytes {
        return Err(AppError::invalid_field(
            field,
            "max",
            &format!(
                "The {} may not be greater than {} kilobytes.",
                field.replace('_', " "),
                max_bytes / 1024
            ),
        ));
    }
    Ok(())
}
