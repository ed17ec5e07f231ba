//! Fetch-or-fallback acquisition of a signing credential bundle

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::blob::{is_contained_name, BlobConnector, BlobContainerClient, StorageError};
use crate::logging::{DebugFileLogger, SharedLogger};
use crate::resolver::{
    ResolvedConfig, CONNECTION_STRING_KEY, CONTAINER_NAME_KEY, KEY_STORE_FILE_NAME_KEY,
    SUPPORT_DOCUMENT_FILENAME_KEY,
};
use crate::{log_error, log_info, log_warn};

use super::embedded::embedded_default;
use super::error::AcquisitionError;
use super::types::{CredentialBundle, CredentialDescriptor};

/// Extension every keystore blob name ends with
pub const KEYSTORE_EXTENSION: &str = ".jks";
/// Extension every descriptor blob name ends with
pub const DESCRIPTOR_EXTENSION: &str = ".json";

/// Append `extension` unless `name` already ends with it
pub fn normalize_file_name(name: &str, extension: &str) -> String {
    if name.ends_with(extension) {
        name.to_string()
    } else {
        format!("{}{}", name, extension)
    }
}

/// Local files written during an acquisition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadedFiles {
    pub keystore: Option<PathBuf>,
    pub descriptor: Option<PathBuf>,
}

impl DownloadedFiles {
    /// Paths that exist because of this acquisition
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.keystore.iter().chain(self.descriptor.iter()).map(PathBuf::as_path)
    }
}

/// Outcome of one acquisition, with diagnostics
#[derive(Debug)]
pub struct Acquisition {
    /// The bundle callers should use
    pub bundle: CredentialBundle,
    /// Every problem observed, in the order it happened
    pub failures: Vec<AcquisitionError>,
    pub downloaded: DownloadedFiles,
}

impl Acquisition {
    pub fn used_default(&self) -> bool {
        self.bundle.is_default()
    }
}

/// Names and client that passed validation
struct Target {
    container: Arc<dyn BlobContainerClient>,
    keystore_name: String,
    descriptor_name: String,
}

/// Downloads a keystore and its credential descriptor, or falls back
///
/// `acquire` never fails. Either both remote objects arrive and the
/// descriptor parses, or the embedded default is returned; a bundle never
/// mixes remote and default material.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use remote_keystore_core::blob::MemoryBlobConnector;
/// use remote_keystore_core::credentials::CredentialAcquisitionEngine;
/// use remote_keystore_core::resolver::ResolvedConfig;
///
/// let dir = std::env::temp_dir();
/// let engine = CredentialAcquisitionEngine::new(Arc::new(MemoryBlobConnector::new()), dir);
///
/// // Nothing configured: the embedded default comes back
/// let bundle = engine.acquire(&ResolvedConfig::default());
/// assert!(bundle.is_default());
/// ```
pub struct CredentialAcquisitionEngine {
    connector: Arc<dyn BlobConnector>,
    download_dir: PathBuf,
    logger: SharedLogger,
}

impl CredentialAcquisitionEngine {
    /// Create an engine that downloads into `download_dir`
    pub fn new(connector: Arc<dyn BlobConnector>, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            connector,
            download_dir: download_dir.into(),
            logger: Arc::new(DebugFileLogger::default()),
        }
    }

    /// Report progress through `logger`
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Produce a usable bundle for `config`
    pub fn acquire(&self, config: &ResolvedConfig) -> CredentialBundle {
        self.acquire_with_report(config).bundle
    }

    /// Produce a bundle along with every failure observed on the way
    pub fn acquire_with_report(&self, config: &ResolvedConfig) -> Acquisition {
        log_info!(self.logger, "Starting retrieval of key store information from blob storage.");

        let mut failures = Vec::new();
        let mut downloaded = DownloadedFiles::default();

        let remote = match self.validate(config) {
            Ok(target) => self.fetch(&target, &mut failures, &mut downloaded),
            Err(e) => {
                log_error!(self.logger, "{}", e);
                failures.push(e);
                None
            }
        };

        let bundle = match remote {
            Some(bundle) => {
                log_info!(self.logger, "Successfully retrieved and set key store information.");
                bundle
            }
            None => {
                log_warn!(
                    self.logger,
                    "Falling back to the embedded default signing identity ({} problem(s) during retrieval).",
                    failures.len()
                );
                embedded_default().clone()
            }
        };

        Acquisition {
            bundle,
            failures,
            downloaded,
        }
    }

    /// Steps that must pass before any download is attempted
    fn validate(&self, config: &ResolvedConfig) -> Result<Target, AcquisitionError> {
        let fields = [
            (CONNECTION_STRING_KEY, &config.connection_string),
            (CONTAINER_NAME_KEY, &config.container_name),
            (KEY_STORE_FILE_NAME_KEY, &config.key_store_file_name),
            (SUPPORT_DOCUMENT_FILENAME_KEY, &config.support_document_filename),
        ];
        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
            .map(|(key, _)| *key)
            .collect();
        if !missing.is_empty() {
            return Err(AcquisitionError::ConfigurationIncomplete(missing));
        }

        // All four are present past this point
        let connection_string = config.connection_string.as_deref().unwrap_or_default();
        let container_name = config.container_name.as_deref().unwrap_or_default();
        let key_store_file_name = config.key_store_file_name.as_deref().unwrap_or_default();
        let support_document_filename = config.support_document_filename.as_deref().unwrap_or_default();

        let keystore_name = normalize_file_name(key_store_file_name, KEYSTORE_EXTENSION);
        let descriptor_name = normalize_file_name(support_document_filename, DESCRIPTOR_EXTENSION);
        for (key, name) in [
            (KEY_STORE_FILE_NAME_KEY, &keystore_name),
            (SUPPORT_DOCUMENT_FILENAME_KEY, &descriptor_name),
        ] {
            if !is_contained_name(name) {
                return Err(AcquisitionError::InvalidObjectName {
                    key,
                    name: name.clone(),
                });
            }
        }

        let container = self
            .connector
            .connect(connection_string, container_name)
            .map_err(|e| AcquisitionError::RemoteUnavailable {
                container: container_name.to_string(),
                reason: e.to_string(),
            })?;

        if !container.exists() {
            return Err(AcquisitionError::RemoteUnavailable {
                container: container_name.to_string(),
                reason: "container does not exist or is unreachable".to_string(),
            });
        }

        Ok(Target {
            container,
            keystore_name,
            descriptor_name,
        })
    }

    /// Attempt both downloads; commit only if everything succeeded
    fn fetch(
        &self,
        target: &Target,
        failures: &mut Vec<AcquisitionError>,
        downloaded: &mut DownloadedFiles,
    ) -> Option<CredentialBundle> {
        // The keystore outcome does not gate the descriptor attempt
        let keystore_path = self.download(target, &target.keystore_name, "keystore file", failures);
        downloaded.keystore = keystore_path.clone();

        let descriptor_path = self.download(target, &target.descriptor_name, "support document", failures);
        downloaded.descriptor = descriptor_path.clone();

        let descriptor = descriptor_path.and_then(|path| match read_descriptor(&path) {
            Ok(descriptor) => Some(descriptor),
            Err(reason) => {
                let e = AcquisitionError::MalformedDescriptor {
                    object: target.descriptor_name.clone(),
                    reason,
                };
                log_error!(self.logger, "{}", e);
                failures.push(e);
                None
            }
        });

        let (keystore_path, descriptor) = match (keystore_path, descriptor) {
            (Some(path), Some(descriptor)) => (path, descriptor),
            _ => return None,
        };

        match fs::read(&keystore_path) {
            Ok(keystore) => Some(CredentialBundle::remote(keystore, descriptor, keystore_path)),
            Err(e) => {
                let e = AcquisitionError::TransferFailure {
                    object: target.keystore_name.clone(),
                    source: StorageError::Io(e),
                };
                log_error!(self.logger, "{}", e);
                failures.push(e);
                None
            }
        }
    }

    fn download(
        &self,
        target: &Target,
        object: &str,
        what: &str,
        failures: &mut Vec<AcquisitionError>,
    ) -> Option<PathBuf> {
        let path = self.download_dir.join(object);
        log_info!(self.logger, "Downloading {} {}.", what, object);

        match target.container.get_object(object).download_to_file(&path, true) {
            Ok(bytes) => {
                crate::logging::debug("engine", &format!("Wrote {} bytes to {}", bytes, path.display()));
                Some(path)
            }
            Err(source) => {
                log_error!(self.logger, "Error downloading {}: {}", object, source);
                failures.push(AcquisitionError::TransferFailure {
                    object: object.to_string(),
                    source,
                });
                None
            }
        }
    }
}

impl std::fmt::Debug for CredentialAcquisitionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialAcquisitionEngine")
            .field("download_dir", &self.download_dir)
            .finish()
    }
}

fn read_descriptor(path: &Path) -> Result<CredentialDescriptor, String> {
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
    CredentialDescriptor::from_json(&text).map_err(|e| e.to_string())
}
