//! Local directory acting as a blob container

use std::fs;
use std::path::{Path, PathBuf};

use super::traits::{is_contained_name, prepare_destination, BlobContainerClient, BlobObject, StorageError, StorageResult};

/// A container backed by a directory
///
/// Reached through `BlobEndpoint=file:///some/dir`: the container is the
/// subdirectory named after it. Useful for offline builds and CI mirrors.
#[derive(Debug, Clone)]
pub struct FsBlobContainer {
    name: String,
    root: PathBuf,
}

impl FsBlobContainer {
    /// `endpoint_dir` holds one subdirectory per container
    pub fn new(endpoint_dir: impl AsRef<Path>, container: impl Into<String>) -> Self {
        let name = container.into();
        Self {
            root: endpoint_dir.as_ref().join(&name),
            name,
        }
    }

    /// Directory holding this container's objects
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, name: &str) -> Option<PathBuf> {
        is_contained_name(name).then(|| self.root.join(name))
    }
}

impl BlobContainerClient for FsBlobContainer {
    fn name(&self) -> &str {
        &self.name
    }

    fn exists(&self) -> bool {
        self.root.is_dir()
    }

    fn get_object<'a>(&'a self, name: &str) -> Box<dyn BlobObject + 'a> {
        Box::new(FsBlob {
            container: self,
            name: name.to_string(),
        })
    }
}

struct FsBlob<'a> {
    container: &'a FsBlobContainer,
    name: String,
}

impl BlobObject for FsBlob<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn download_to_file(&self, path: &Path, overwrite: bool) -> StorageResult<u64> {
        if !self.container.exists() {
            return Err(StorageError::ContainerNotFound(self.container.name.clone()));
        }
        // Object names may not escape the container directory
        let source = self
            .container
            .object_path(&self.name)
            .filter(|p| p.is_file())
            .ok_or_else(|| StorageError::NotFound(self.name.clone()))?;

        prepare_destination(path, overwrite)?;
        Ok(fs::copy(source, path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FsBlobContainer) {
        let dir = TempDir::new().unwrap();
        let container = FsBlobContainer::new(dir.path().join("endpoint"), "keys");
        fs::create_dir_all(container.root()).unwrap();
        fs::write(container.root().join("release.json"), br#"{"keyAlias":"a"}"#).unwrap();
        (dir, container)
    }

    #[test]
    fn test_exists_tracks_directory() {
        let dir = TempDir::new().unwrap();
        let container = FsBlobContainer::new(dir.path(), "keys");
        assert!(!container.exists());
        fs::create_dir(dir.path().join("keys")).unwrap();
        assert!(container.exists());
    }

    #[test]
    fn test_download_copies_file() {
        let (dir, container) = setup();
        let target = dir.path().join("out/release.json");
        let written = container
            .get_object("release.json")
            .download_to_file(&target, false)
            .unwrap();
        assert_eq!(written, 16);
        assert_eq!(fs::read_to_string(target).unwrap(), r#"{"keyAlias":"a"}"#);
    }

    #[test]
    fn test_no_overwrite() {
        let (dir, container) = setup();
        let target = dir.path().join("release.json");
        fs::write(&target, "old").unwrap();
        let result = container.get_object("release.json").download_to_file(&target, false);
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
        assert_eq!(fs::read_to_string(target).unwrap(), "old");
    }

    #[test]
    fn test_rejects_escaping_names() {
        let (dir, container) = setup();
        fs::write(dir.path().join("endpoint/secret.txt"), "outside").unwrap();
        let result = container
            .get_object("../secret.txt")
            .download_to_file(&dir.path().join("x"), true);
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
