//! Object storage for uploaded images
//!
//! Callers only ever hold the path returned by `store`; public URLs are
//! derived from it on the way out.
use async_trait::async_trait;
use mime::Mime;
use uuid::Uuid;

use crate::error::Result;

pub mod memory;
pub mod s3;

pub use memory::MemoryStorage;
pub use s3::S3Storage;

/// A fully buffered upload
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub content_type: Mime,
    pub file_name: Option<String>,
}

impl UploadedFile {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Extension for the stored object, taken from the content type.
    pub fn extension(&self) -> &'static str {
        match self.content_type.essence_str() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "bin",
        }
    }
}

#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store `file` under `directory` and return its storage path.
    async fn store(&self, directory: &str, file: UploadedFile) -> Result<String>;

    /// Remove the object at `path`. Missing objects are not an error.
    async fn delete(&self, path: &str) -> Result<()>;

    /// Absolute or root-relative URL clients can fetch `path` from.
    fn public_url(&self, path: &str) -> String;
}

/// `directory/<uuid>.<ext>`
pub fn object_key(directory: &str, file: &UploadedFile) -> String {
    format!(
        "{}/{}.{}",
        directory.trim_matches('/'),
        Uuid::new_v4(),
        file.extension()
    )
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
