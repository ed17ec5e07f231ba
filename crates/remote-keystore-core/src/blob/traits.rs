//! Core traits and types for blob storage access

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Errors raised by blob storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    #[error("Destination already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("Storage service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),

    #[error("Unsupported blob endpoint: {0}")]
    Unsupported(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Client bound to a single container
///
/// Implementations:
/// - `MemoryBlobContainer`: In-memory objects for tests
/// - `FsBlobContainer`: A local directory acting as the container
/// - `HttpBlobContainer`: Azure Blob REST endpoint
pub trait BlobContainerClient: Send + Sync {
    /// Container name
    fn name(&self) -> &str;

    /// Whether the container exists and is reachable
    ///
    /// Transport failures report `false`; callers cannot tell an unreachable
    /// service from a missing container and do not need to.
    fn exists(&self) -> bool;

    /// Handle to a named object in this container
    ///
    /// Does not touch the remote; failures surface on download.
    fn get_object<'a>(&'a self, name: &str) -> Box<dyn BlobObject + 'a>;
}

/// Handle to one object in a container
pub trait BlobObject {
    /// Object name within the container
    fn name(&self) -> &str;

    /// Download the object to `path`, returning the number of bytes written
    ///
    /// With `overwrite == false` an existing file at `path` is
    /// `StorageError::AlreadyExists`. Missing parent directories are created.
    fn download_to_file(&self, path: &Path, overwrite: bool) -> StorageResult<u64>;
}

/// `true` when `name` is a relative path made only of normal components
///
/// Such a name joined onto a directory stays inside that directory.
pub(crate) fn is_contained_name(name: &str) -> bool {
    !name.is_empty()
        && Path::new(name)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

/// Shared precondition check for `download_to_file` implementations
pub(crate) fn prepare_destination(path: &Path, overwrite: bool) -> StorageResult<()> {
    if !overwrite && path.exists() {
        return Err(StorageError::AlreadyExists(path.to_path_buf()));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_destination_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/release.jks");
        prepare_destination(&path, false).unwrap();
        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn test_prepare_destination_respects_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("release.jks");
        std::fs::write(&path, b"old").unwrap();

        assert!(matches!(
            prepare_destination(&path, false),
            Err(StorageError::AlreadyExists(_))
        ));
        prepare_destination(&path, true).unwrap();
    }

    #[test]
    fn test_contained_names() {
        assert!(is_contained_name("release.jks"));
        assert!(is_contained_name("signing/release.jks"));
        assert!(!is_contained_name(""));
        assert!(!is_contained_name("../release.jks"));
        assert!(!is_contained_name("signing/../../release.jks"));
        assert!(!is_contained_name("/etc/release.jks"));
        assert!(!is_contained_name("./release.jks"));
    }
}
