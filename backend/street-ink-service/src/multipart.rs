//! Buffered multipart form reading.
//!
//! Text parts are collected by name (a trailing `[]` is dropped so `tags[]`
//! and `tags` land together). File parts are buffered up to a per-field cap;
//! anything larger is rejected before it is fully read.

use actix_multipart::Multipart;
use futures_util::stream::StreamExt;
use std::collections::HashMap;

use crate::error::AppError;
use crate::storage::UploadedFile;

const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

#[derive(Debug, Default)]
pub struct FormData {
    texts: HashMap<String, Vec<String>>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    /// Last value sent for `name`.
    pub fn text(&mut self, name: &str) -> Option<String> {
        self.texts.get_mut(name).and_then(|values| values.pop())
    }

    pub fn texts(&mut self, name: &str) -> Vec<String> {
        self.texts.remove(name).unwrap_or_default()
    }

    pub fn file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

fn too_large(field: &str, max_bytes: usize) -> AppError {
    let message = format!(
        "The {} may not be greater than {} kilobytes.",
        field.replace('_', " "),
        max_bytes / 1024
    );
    match field {
        "image_url" => AppError::invalid_field("image_url", "max", &message),
        "avatar" => AppError::invalid_field("avatar", "max", &message),
        "cover_photo" => AppError::invalid_field("cover_photo", "max", &message),
        _ => AppError::BadRequest(message),
    }
}

/// Read the whole form. `file_limits` maps each accepted file field to its
/// byte cap; file parts with other names are rejected.
pub async fn read_form(
    mut payload: Multipart,
    file_limits: &[(&str, usize)],
) -> Result<FormData, AppError> {
    let mut form = FormData::default();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?;

        let name = field
            .name()
            .map(|n| n.trim_end_matches("[]").to_string())
            .ok_or_else(|| AppError::BadRequest("Multipart field without a name".to_string()))?;
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        if let Some(file_name) = file_name {
            let max_bytes = file_limits
                .iter()
                .find(|(field_name, _)| *field_name == name)
                .map(|(_, max)| *max)
                .ok_or_else(|| AppError::BadRequest(format!("Unexpected file field '{}'", name)))?;
            let content_type = field
                .content_type()
                .cloned()
                .unwrap_or(mime::APPLICATION_OCTET_STREAM);

            let mut bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk = chunk
                    .map_err(|e| AppError::BadRequest(format!("Error reading upload: {}", e)))?;
                if bytes.len() + chunk.len() > max_bytes {
                    return Err(too_large(&name, max_bytes));
                }
                bytes.extend_from_slice(&chunk);
            }

            // Browsers send an empty part when no file was picked.
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            form.files.insert(
                name,
                UploadedFile {
                    bytes,
                    content_type,
                    file_name: Some(file_name),
                },
            );
        } else {
            let mut bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk = chunk
                    .map_err(|e| AppError::BadRequest(format!("Error reading field: {}", e)))?;
                if bytes.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
                    return Err(AppError::BadRequest(format!("Field '{}' is too large", name)));
                }
                bytes.extend_from_slice(&chunk);
            }
            let value = String::from_utf8(bytes)
                .map_err(|_| AppError::BadRequest(format!("Field '{}' is not valid UTF-8", name)))?;
            form.texts.entry(name).or_default().push(value);
        }
    }

    Ok(form)
}
