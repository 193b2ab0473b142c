use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, error};

use super::{join_url, object_key, MediaStorage, UploadedFile};
use crate::error::{AppError, Result};

/// S3-backed media storage
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3Storage {
    pub fn new(client: Client, bucket: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Build a client from the ambient AWS configuration (env, profile, IMDS).
    pub async fn from_env(bucket: impl Into<String>, public_base_url: impl Into<String>) -> Self {
        let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::new(Client::new(&shared), bucket, public_base_url)
    }
}

#[async_trait]
impl MediaStorage for S3Storage {
    async fn store(&self, directory: &str, file: UploadedFile) -> Result<String> {
        let key = object_key(directory, &file);
        let size = file.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(file.content_type.essence_str())
            .body(ByteStream::from(file.bytes))
            .send()
            .await
            .map_err(|e| {
                error!(bucket = %self.bucket, key = %key, "S3 upload failed: {}", e);
                AppError::Storage(format!("failed to upload {}", key))
            })?;

        debug!(key = %key, size, "Stored object");
        Ok(key)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| {
                error!(bucket = %self.bucket, key = %path, "S3 delete failed: {}", e);
                AppError::Storage(format!("failed to delete {}", path))
            })?;

        debug!(key = %path, "Deleted object");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        join_url(&self.public_base_url, path)
    }
}
