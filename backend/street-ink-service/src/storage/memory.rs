use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{join_url, object_key, MediaStorage, UploadedFile};
use crate::error::{AppError, Result};

/// Process-local storage for development and tests
#[derive(Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<Mutex<HashMap<String, UploadedFile>>>,
    public_base_url: String,
}

impl MemoryStorage {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            objects: Arc::default(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects
            .lock()
            .map(|objects| objects.contains_key(path))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seed an object at a fixed path.
    pub fn insert(&self, path: impl Into<String>, file: UploadedFile) {
        if let Ok(mut objects) = self.objects.lock() {
            objects.insert(path.into(), file);
        }
    }
}

#[async_trait]
impl MediaStorage for MemoryStorage {
    async fn store(&self, directory: &str, file: UploadedFile) -> Result<String> {
        let key = object_key(directory, &file);
        self.objects
            .lock()
            .map_err(|_| AppError::Storage("storage lock poisoned".to_string()))?
            .insert(key.clone(), file);
        Ok(key)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.objects
            .lock()
            .map_err(|_| AppError::Storage("storage lock poisoned".to_string()))?
            .remove(path);
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        join_url(&self.public_base_url, path)
    }
}
