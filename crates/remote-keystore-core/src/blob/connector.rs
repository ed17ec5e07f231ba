//! Turning a connection string and container name into a client

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use super::connection::ConnectionString;
use super::fs::FsBlobContainer;
use super::http::{HttpBlobContainer, DEFAULT_TIMEOUT};
use super::memory::MemoryBlobContainer;
use super::traits::{BlobContainerClient, StorageError, StorageResult};

/// Builds container clients for the acquisition engine
pub trait BlobConnector: Send + Sync {
    /// Connect to `container` using `connection_string`
    ///
    /// Must not perform the existence check; the engine does that.
    fn connect(
        &self,
        connection_string: &str,
        container: &str,
    ) -> StorageResult<Arc<dyn BlobContainerClient>>;
}

/// Picks a client from the blob endpoint's scheme
///
/// - `file://` → `FsBlobContainer`
/// - `http://`, `https://` → `HttpBlobContainer`
#[derive(Debug, Clone)]
pub struct DefaultBlobConnector {
    timeout: Duration,
}

impl Default for DefaultBlobConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultBlobConnector {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Request timeout for HTTP endpoints
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl BlobConnector for DefaultBlobConnector {
    fn connect(
        &self,
        connection_string: &str,
        container: &str,
    ) -> StorageResult<Arc<dyn BlobContainerClient>> {
        let connection = ConnectionString::parse(connection_string)?;
        let endpoint = connection.blob_endpoint();
        crate::logging::debug(
            "blob_connector",
            &format!("Connecting to container {} via {} endpoint", container, endpoint.scheme()),
        );

        match endpoint.scheme() {
            "file" => {
                let dir = endpoint
                    .to_file_path()
                    .map_err(|_| StorageError::Unsupported(endpoint.to_string()))?;
                Ok(Arc::new(FsBlobContainer::new(dir, container)))
            }
            "http" | "https" => Ok(Arc::new(HttpBlobContainer::new(
                &connection,
                container,
                self.timeout,
            )?)),
            other => Err(StorageError::Unsupported(format!("scheme '{}'", other))),
        }
    }
}

/// Hands out pre-registered in-memory containers
///
/// The connection string is ignored; only the container name matters.
/// Unknown names connect to a container that does not exist.
#[derive(Debug, Default)]
pub struct MemoryBlobConnector {
    containers: RwLock<HashMap<String, Arc<MemoryBlobContainer>>>,
}

impl MemoryBlobConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `container` under its own name
    pub fn with_container(self, container: Arc<MemoryBlobContainer>) -> Self {
        self.insert(container);
        self
    }

    pub fn insert(&self, container: Arc<MemoryBlobContainer>) {
        self.containers
            .write()
            .insert(container.name().to_string(), container);
    }
}

impl BlobConnector for MemoryBlobConnector {
    fn connect(
        &self,
        _connection_string: &str,
        container: &str,
    ) -> StorageResult<Arc<dyn BlobContainerClient>> {
        let found = self.containers.read().get(container).cloned();
        Ok(match found {
            Some(c) => c,
            None => Arc::new(MemoryBlobContainer::missing(container)),
        })
    }
}
