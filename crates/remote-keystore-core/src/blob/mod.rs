//! Blob storage access
//!
//! This module provides:
//! - `BlobContainerClient` / `BlobObject` traits the engine downloads through
//! - Built-in containers: `MemoryBlobContainer`, `FsBlobContainer`, `HttpBlobContainer`
//! - `BlobConnector` implementations that build a container client from a
//!   connection string

mod traits;
mod connection;
mod memory;
mod fs;
mod http;
mod connector;

pub use traits::{BlobContainerClient, BlobObject, StorageError, StorageResult};
pub(crate) use traits::is_contained_name;
pub use connection::{ConnectionString, Credential, DEV_STORAGE_ACCOUNT, DEV_STORAGE_KEY};
pub use memory::MemoryBlobContainer;
pub use fs::FsBlobContainer;
pub use http::{HttpBlobContainer, API_VERSION, DEFAULT_TIMEOUT};
pub use connector::{BlobConnector, DefaultBlobConnector, MemoryBlobConnector};
