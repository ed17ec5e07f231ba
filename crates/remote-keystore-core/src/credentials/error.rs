//! Acquisition failure taxonomy

use thiserror::Error;

use crate::blob::StorageError;

/// Everything that can send the engine to the embedded default
///
/// Only `CorruptEmbeddedDefault` is fatal; the engine records every other
/// variant and keeps going.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("Configuration incomplete: missing {}", .0.join(", "))]
    ConfigurationIncomplete(Vec<&'static str>),

    #[error("{key} value '{name}' would leave the download directory")]
    InvalidObjectName { key: &'static str, name: String },

    #[error("Remote container {container} unavailable: {reason}")]
    RemoteUnavailable { container: String, reason: String },

    #[error("Failed to transfer {object}: {source}")]
    TransferFailure {
        object: String,
        #[source]
        source: StorageError,
    },

    #[error("Malformed credential descriptor {object}: {reason}")]
    MalformedDescriptor { object: String, reason: String },

    #[error("Embedded default keystore is corrupt: {0}")]
    CorruptEmbeddedDefault(#[from] hex::FromHexError),
}

pub type AcquisitionResult<T> = Result<T, AcquisitionError>;
