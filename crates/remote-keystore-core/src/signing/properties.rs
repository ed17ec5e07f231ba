//! Signing properties derived from a credential bundle

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::credentials::CredentialBundle;

pub const KEYSTORE_FILE_PROPERTY: &str = "keystoreFile";
pub const STORE_PASSWORD_PROPERTY: &str = "storePassword";
pub const KEY_ALIAS_PROPERTY: &str = "keyAlias";
pub const KEY_PASSWORD_PROPERTY: &str = "keyPassword";

/// File the embedded default keystore is written to
pub const DEFAULT_KEYSTORE_FILE_NAME: &str = "default-signing.jks";

/// The four values a build's signing configuration consumes
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningProperties {
    pub keystore_file: PathBuf,
    pub store_password: String,
    pub key_alias: String,
    pub key_password: String,
    /// Whether these came from the embedded default
    pub is_default: bool,
}

impl SigningProperties {
    /// Derive signing properties, materializing the keystore if needed
    ///
    /// Remote bundles point at their downloaded file. The default bundle has
    /// no file, so its payload is written to `root/default-signing.jks`.
    pub fn from_bundle(bundle: &CredentialBundle, root: impl AsRef<Path>) -> io::Result<Self> {
        let keystore_file = match bundle.keystore_path() {
            Some(path) => path.to_path_buf(),
            None => {
                let path = root.as_ref().join(DEFAULT_KEYSTORE_FILE_NAME);
                fs::write(&path, bundle.keystore_bytes())?;
                path
            }
        };

        Ok(Self {
            keystore_file,
            store_password: bundle.store_password().to_string(),
            key_alias: bundle.key_alias().to_string(),
            key_password: bundle.key_password().to_string(),
            is_default: bundle.is_default(),
        })
    }

    /// Property name to value, as a host property bag expects them
    pub fn to_map(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            (KEYSTORE_FILE_PROPERTY, self.keystore_file.display().to_string()),
            (STORE_PASSWORD_PROPERTY, self.store_password.clone()),
            (KEY_ALIAS_PROPERTY, self.key_alias.clone()),
            (KEY_PASSWORD_PROPERTY, self.key_password.clone()),
        ])
    }

    /// Render as `.properties` text
    pub fn to_properties_string(&self) -> String {
        self.to_map()
            .into_iter()
            .map(|(key, value)| format!("{}={}\n", key, escape_value(&value)))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl std::fmt::Debug for SigningProperties {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningProperties")
            .field("keystore_file", &self.keystore_file)
            .field("store_password", &"***")
            .field("key_alias", &self.key_alias)
            .field("key_password", &"***")
            .field("is_default", &self.is_default)
            .finish()
    }
}

fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // Leading whitespace would be eaten by the parser
            ' ' if i == 0 => out.push_str("\\ "),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_properties;
    use crate::credentials::{embedded_default, DEFAULT_KEY_ALIAS};
    use tempfile::TempDir;

    #[test]
    fn test_default_bundle_is_materialized() {
        let dir = TempDir::new().unwrap();
        let props = SigningProperties::from_bundle(embedded_default(), dir.path()).unwrap();

        assert!(props.is_default);
        assert_eq!(props.keystore_file, dir.path().join(DEFAULT_KEYSTORE_FILE_NAME));
        assert_eq!(fs::read(&props.keystore_file).unwrap(), embedded_default().keystore_bytes());
        assert_eq!(props.key_alias, DEFAULT_KEY_ALIAS);
    }

    #[test]
    fn test_map_keys() {
        let dir = TempDir::new().unwrap();
        let props = SigningProperties::from_bundle(embedded_default(), dir.path()).unwrap();
        let keys: Vec<_> = props.to_map().into_keys().collect();
        assert_eq!(keys, vec!["keyAlias", "keyPassword", "keystoreFile", "storePassword"]);
    }

    #[test]
    fn test_properties_text_survives_parsing() {
        let props = SigningProperties {
            keystore_file: PathBuf::from("C:\\builds\\release.jks"),
            store_password: " lead=ing:pw".to_string(),
            key_alias: "release".to_string(),
            key_password: "tab\there".to_string(),
            is_default: false,
        };

        let parsed: BTreeMap<String, String> = parse_properties(&props.to_properties_string())
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(parsed["keystoreFile"], "C:\\builds\\release.jks");
        assert_eq!(parsed["storePassword"], " lead=ing:pw");
        assert_eq!(parsed["keyPassword"], "tab\there");
    }

    #[test]
    fn test_json_field_names() {
        let dir = TempDir::new().unwrap();
        let props = SigningProperties::from_bundle(embedded_default(), dir.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&props.to_json().unwrap()).unwrap();
        assert_eq!(value["keyAlias"], DEFAULT_KEY_ALIAS);
        assert_eq!(value["isDefault"], true);
        assert!(value["keystoreFile"].as_str().unwrap().ends_with(DEFAULT_KEYSTORE_FILE_NAME));
    }

    #[test]
    fn test_debug_redacts() {
        let dir = TempDir::new().unwrap();
        let props = SigningProperties::from_bundle(embedded_default(), dir.path()).unwrap();
        let rendered = format!("{:?}", props);
        assert!(!rendered.contains(&format!("\"{}\"", crate::credentials::DEFAULT_STORE_PASSWORD)));
    }
}
