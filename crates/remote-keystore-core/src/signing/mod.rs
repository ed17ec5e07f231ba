//! Publishing a bundle to the build and removing it afterwards
//!
//! The host puts `SigningProperties` wherever its signing configuration reads
//! from, and calls `cleanup` once packaging is done.

mod properties;
mod cleanup;

pub use properties::{
    SigningProperties, DEFAULT_KEYSTORE_FILE_NAME,
    KEYSTORE_FILE_PROPERTY, STORE_PASSWORD_PROPERTY, KEY_ALIAS_PROPERTY, KEY_PASSWORD_PROPERTY,
};
pub use cleanup::cleanup;
