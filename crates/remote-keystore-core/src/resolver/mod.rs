//! Resolution of connection parameters from layered property sources

mod config_resolver;

pub use config_resolver::{
    ConfigResolver, ResolvedConfig, ResolvedValue,
    CONNECTION_STRING_KEY, CONTAINER_NAME_KEY,
    KEY_STORE_FILE_NAME_KEY, SUPPORT_DOCUMENT_FILENAME_KEY,
};
