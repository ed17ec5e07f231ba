//! Configuration errors

use std::path::PathBuf;

/// Errors that can occur while building property sources
///
/// Resolution itself never fails; these only come from loading sources.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid properties syntax at line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Invalid override '{0}', expected key=value")]
    InvalidOverride(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
