//! Remote Keystore Core
//!
//! Resolves build signing credentials from blob storage, falling back to an
//! embedded default identity whenever remote retrieval is incomplete.
//! Host integrations (build plugins, the CLI) supply property sources and
//! publish the resulting bundle; this crate holds no global state besides the
//! immutable default.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use remote_keystore_core::{
//!     ConfigResolver, CredentialAcquisitionEngine, DefaultBlobConnector,
//!     PropertySource, SigningProperties,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let root = std::path::Path::new(".");
//! let resolver = ConfigResolver::for_project(root, PropertySource::new("command line"))?;
//!
//! let engine = CredentialAcquisitionEngine::new(Arc::new(DefaultBlobConnector::new()), root);
//! let bundle = engine.acquire(&resolver.resolve_config());
//!
//! let props = SigningProperties::from_bundle(&bundle, root)?;
//! print!("{}", props.to_properties_string());
//! # Ok(())
//! # }
//! ```

pub mod logging;
pub mod config;
pub mod resolver;
pub mod blob;
pub mod credentials;
pub mod signing;

pub use logging::{Logger, SharedLogger, DebugFileLogger, ConsoleLogger, MemoryLogger};

pub use config::{PropertySource, ConfigError, ConfigResult};

pub use resolver::{ConfigResolver, ResolvedConfig, ResolvedValue};

pub use blob::{
    BlobContainerClient, BlobObject, BlobConnector, StorageError, StorageResult,
    DefaultBlobConnector, MemoryBlobConnector,
    MemoryBlobContainer, FsBlobContainer, HttpBlobContainer, ConnectionString,
};

pub use credentials::{
    CredentialAcquisitionEngine, Acquisition, DownloadedFiles,
    CredentialBundle, CredentialDescriptor, AcquisitionError,
    embedded_default,
};

pub use signing::{SigningProperties, cleanup};
