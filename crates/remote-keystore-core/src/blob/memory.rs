//! In-memory blob container

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use parking_lot::RwLock;

use super::traits::{prepare_destination, BlobContainerClient, BlobObject, StorageError, StorageResult};

/// In-memory container for testing and embedding
///
/// Existence can be toggled and individual objects can be made to fail so
/// every branch of the acquisition protocol can be exercised without a
/// network.
///
/// # Example
///
/// ```
/// use remote_keystore_core::blob::{BlobContainerClient, MemoryBlobContainer};
///
/// let container = MemoryBlobContainer::new("keys");
/// container.put("release.jks", b"keystore".to_vec());
/// assert!(container.exists());
/// ```
#[derive(Debug)]
pub struct MemoryBlobContainer {
    name: String,
    exists: RwLock<bool>,
    objects: RwLock<HashMap<String, Vec<u8>>>,
    failing: RwLock<HashSet<String>>,
}

impl MemoryBlobContainer {
    /// Create an existing, empty container
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exists: RwLock::new(true),
            objects: RwLock::new(HashMap::new()),
            failing: RwLock::new(HashSet::new()),
        }
    }

    /// Create a container that reports it does not exist
    pub fn missing(name: impl Into<String>) -> Self {
        let container = Self::new(name);
        container.set_exists(false);
        container
    }

    pub fn set_exists(&self, exists: bool) {
        *self.exists.write() = exists;
    }

    /// Store an object, replacing any previous content
    pub fn put(&self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.objects.write().insert(name.into(), data.into());
    }

    pub fn remove(&self, name: &str) {
        self.objects.write().remove(name);
    }

    /// Make downloads of `name` fail with a service error
    pub fn fail_downloads_of(&self, name: impl Into<String>) {
        self.failing.write().insert(name.into());
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobContainerClient for MemoryBlobContainer {
    fn name(&self) -> &str {
        &self.name
    }

    fn exists(&self) -> bool {
        *self.exists.read()
    }

    fn get_object<'a>(&'a self, name: &str) -> Box<dyn BlobObject + 'a> {
        Box::new(MemoryBlob {
            container: self,
            name: name.to_string(),
        })
    }
}

struct MemoryBlob<'a> {
    container: &'a MemoryBlobContainer,
    name: String,
}

impl BlobObject for MemoryBlob<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn download_to_file(&self, path: &Path, overwrite: bool) -> StorageResult<u64> {
        if !self.container.exists() {
            return Err(StorageError::ContainerNotFound(self.container.name.clone()));
        }
        if self.container.failing.read().contains(&self.name) {
            return Err(StorageError::Service {
                status: 500,
                message: format!("injected failure for {}", self.name),
            });
        }

        let data = self
            .container
            .objects
            .read()
            .get(&self.name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(self.name.clone()))?;

        prepare_destination(path, overwrite)?;
        fs::write(path, &data)?;
        Ok(data.len() as u64)
    }
}
