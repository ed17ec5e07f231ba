//! Signing credential acquisition
//!
//! - `CredentialAcquisitionEngine`: fetch-or-fallback protocol
//! - `CredentialBundle` / `CredentialDescriptor`: what it produces
//! - `embedded_default`: the bundle used when remote retrieval fails

mod types;
mod error;
mod embedded;
mod engine;

pub use types::{CredentialBundle, CredentialDescriptor};
pub use error::{AcquisitionError, AcquisitionResult};
pub use embedded::{
    embedded_default, decode_keystore_hex,
    DEFAULT_KEYSTORE_HEX, DEFAULT_STORE_PASSWORD, DEFAULT_KEY_ALIAS, DEFAULT_KEY_PASSWORD,
};
pub use engine::{
    CredentialAcquisitionEngine, Acquisition, DownloadedFiles,
    normalize_file_name, KEYSTORE_EXTENSION, DESCRIPTOR_EXTENSION,
};
