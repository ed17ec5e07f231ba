//! Named property sources

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::properties::parse_properties;
use super::traits::{ConfigError, ConfigResult};

/// A named mapping from key to optional value
///
/// A key can be present with a `None` value, which is how a host passes a
/// property that exists but is not a string. Sources are immutable once
/// built; the `with*` builders consume and return the source.
///
/// # Example
///
/// ```
/// use remote_keystore_core::config::PropertySource;
///
/// let local = PropertySource::new("local.properties")
///     .with("containerName", "release-keys");
/// assert_eq!(local.get("containerName"), Some("release-keys"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySource {
    name: String,
    values: BTreeMap<String, Option<String>>,
}

impl PropertySource {
    /// Create an empty source
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Create a source from key/value pairs; later pairs replace earlier ones
    pub fn from_pairs<K, V>(name: impl Into<String>, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), Some(v.into())))
            .collect();
        Self {
            name: name.into(),
            values,
        }
    }

    /// Parse `.properties` text
    pub fn from_properties_str(name: impl Into<String>, input: &str) -> ConfigResult<Self> {
        Ok(Self::from_pairs(name, parse_properties(input)?))
    }

    /// Load a `.properties` file, named after its path
    ///
    /// A missing file yields an empty source; any other read failure is an error.
    pub fn load_properties_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();

        match fs::read_to_string(path) {
            Ok(content) => {
                let source = Self::from_properties_str(name, &content)?;
                crate::logging::debug(
                    "property_source",
                    &format!("Loaded {} keys from {}", source.len(), path.display()),
                );
                Ok(source)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                crate::logging::debug(
                    "property_source",
                    &format!("{} not found, using empty source", path.display()),
                );
                Ok(Self::new(name))
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Build a source from `key=value` strings (command-line `-P` overrides)
    pub fn from_overrides<S: AsRef<str>>(
        name: impl Into<String>,
        overrides: impl IntoIterator<Item = S>,
    ) -> ConfigResult<Self> {
        let mut source = Self::new(name);
        for raw in overrides {
            let raw = raw.as_ref();
            match raw.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    source = source.with(key.trim(), value);
                }
                _ => return Err(ConfigError::InvalidOverride(raw.to_string())),
            }
        }
        Ok(source)
    }

    /// Return a copy with `key` set to `value`
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), Some(value.into()));
        self
    }

    /// Return a copy with `key` present but null
    pub fn with_null(mut self, key: impl Into<String>) -> Self {
        self.values.insert(key.into(), None);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value for `key`, `None` when absent or null
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_deref())
    }

    /// Whether `key` is present at all, even with a null value
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
