//! Credential descriptor and bundle types

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Passwords and alias that unlock a keystore
///
/// Parsed from a flat JSON object. All three fields are required and must be
/// strings; a missing or `null` field fails the whole parse.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDescriptor {
    pub store_password: String,
    pub key_alias: String,
    pub key_password: String,
}

impl CredentialDescriptor {
    pub fn new(
        store_password: impl Into<String>,
        key_alias: impl Into<String>,
        key_password: impl Into<String>,
    ) -> Self {
        Self {
            store_password: store_password.into(),
            key_alias: key_alias.into(),
            key_password: key_password.into(),
        }
    }

    /// Parse the descriptor document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// Passwords never end up in debug output or logs
impl std::fmt::Debug for CredentialDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialDescriptor")
            .field("store_password", &"***")
            .field("key_alias", &self.key_alias)
            .field("key_password", &"***")
            .finish()
    }
}

/// Keystore bytes plus the descriptor that unlocks them
///
/// Built in one piece either from a completed remote round-trip or from the
/// embedded default. There is no way to change a field afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialBundle {
    keystore: Arc<[u8]>,
    descriptor: CredentialDescriptor,
    is_default: bool,
    keystore_path: Option<PathBuf>,
}

impl CredentialBundle {
    /// Bundle assembled from downloaded materials
    pub(crate) fn remote(keystore: Vec<u8>, descriptor: CredentialDescriptor, keystore_path: PathBuf) -> Self {
        Self {
            keystore: keystore.into(),
            descriptor,
            is_default: false,
            keystore_path: Some(keystore_path),
        }
    }

    /// Bundle baked into the binary
    pub(crate) fn embedded(keystore: Vec<u8>, descriptor: CredentialDescriptor) -> Self {
        Self {
            keystore: keystore.into(),
            descriptor,
            is_default: true,
            keystore_path: None,
        }
    }

    /// Raw keystore content
    pub fn keystore_bytes(&self) -> &[u8] {
        &self.keystore
    }

    pub fn descriptor(&self) -> &CredentialDescriptor {
        &self.descriptor
    }

    /// `true` when this is the embedded default rather than remote material
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Where the remote keystore was downloaded; `None` for the default
    pub fn keystore_path(&self) -> Option<&Path> {
        self.keystore_path.as_deref()
    }

    pub fn store_password(&self) -> &str {
        &self.descriptor.store_password
    }

    pub fn key_alias(&self) -> &str {
        &self.descriptor.key_alias
    }

    pub fn key_password(&self) -> &str {
        &self.descriptor.key_password
    }
}

impl std::fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialBundle")
            .field("keystore", &format!("[{} bytes]", self.keystore.len()))
            .field("descriptor", &self.descriptor)
            .field("is_default", &self.is_default)
            .field("keystore_path", &self.keystore_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_parses_all_fields() {
        let descriptor = CredentialDescriptor::from_json(
            r#"{"storePassword":"s3cret","keyAlias":"release","keyPassword":"k3y","comment":"ignored"}"#,
        )
        .unwrap();
        assert_eq!(descriptor, CredentialDescriptor::new("s3cret", "release", "k3y"));
    }

    #[test]
    fn test_descriptor_missing_field_fails() {
        let result = CredentialDescriptor::from_json(r#"{"storePassword":"s","keyPassword":"k"}"#);
        assert!(result.unwrap_err().to_string().contains("keyAlias"));
    }

    #[test]
    fn test_descriptor_null_field_fails() {
        let result =
            CredentialDescriptor::from_json(r#"{"storePassword":"s","keyAlias":null,"keyPassword":"k"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_descriptor_non_string_field_fails() {
        let result =
            CredentialDescriptor::from_json(r#"{"storePassword":1234,"keyAlias":"a","keyPassword":"k"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_descriptor_must_be_object() {
        assert!(CredentialDescriptor::from_json(r#"["s","a","k"]"#).is_err());
        assert!(CredentialDescriptor::from_json("not json").is_err());
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let bundle = CredentialBundle::remote(
            vec![1, 2, 3],
            CredentialDescriptor::new("store-pw", "release", "key-pw"),
            PathBuf::from("release.jks"),
        );
        let rendered = format!("{:?}", bundle);
        assert!(rendered.contains("release"));
        assert!(rendered.contains("[3 bytes]"));
        assert!(!rendered.contains("store-pw"));
        assert!(!rendered.contains("key-pw"));
    }

    #[test]
    fn test_bundle_accessors() {
        let bundle = CredentialBundle::embedded(vec![9], CredentialDescriptor::new("a", "b", "c"));
        assert!(bundle.is_default());
        assert_eq!(bundle.keystore_bytes(), &[9]);
        assert_eq!(bundle.keystore_path(), None);
        assert_eq!((bundle.store_password(), bundle.key_alias(), bundle.key_password()), ("a", "b", "c"));
    }
}
