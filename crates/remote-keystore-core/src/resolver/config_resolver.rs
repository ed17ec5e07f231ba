//! First-match-wins resolution across ordered property sources

use std::path::{Path, PathBuf};

use crate::config::{ConfigResult, PropertySource};

/// Key holding the blob storage connection string
pub const CONNECTION_STRING_KEY: &str = "connectionString";
/// Key holding the container name
pub const CONTAINER_NAME_KEY: &str = "containerName";
/// Key holding the keystore blob name
pub const KEY_STORE_FILE_NAME_KEY: &str = "keyStoreFileName";
/// Key holding the credential descriptor blob name
pub const SUPPORT_DOCUMENT_FILENAME_KEY: &str = "supportDocumentFilename";

/// Connection parameters resolved from the property sources
///
/// Every field may still be absent; the acquisition engine decides whether
/// the combination is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub connection_string: Option<String>,
    pub container_name: Option<String>,
    pub key_store_file_name: Option<String>,
    pub support_document_filename: Option<String>,
}

/// A resolved value together with the source that provided it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedValue {
    pub value: String,
    /// Name of the winning source
    pub source: String,
}

/// Resolves keys against property sources in priority order
///
/// The first source holding a non-null value for a key wins. Values are never
/// merged across sources.
///
/// # Example
///
/// ```
/// use remote_keystore_core::config::PropertySource;
/// use remote_keystore_core::resolver::ConfigResolver;
///
/// let local = PropertySource::new("local").with("containerName", "dev-keys");
/// let project = PropertySource::new("project")
///     .with("containerName", "release-keys")
///     .with("keyStoreFileName", "release");
///
/// let resolver = ConfigResolver::new(vec![local, project]);
/// assert_eq!(resolver.resolve("containerName").as_deref(), Some("dev-keys"));
/// assert_eq!(resolver.resolve("keyStoreFileName").as_deref(), Some("release"));
/// assert_eq!(resolver.resolve_or("missing", "fallback"), "fallback");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    sources: Vec<PropertySource>,
}

impl ConfigResolver {
    /// Create a resolver; earlier sources take precedence
    pub fn new(sources: Vec<PropertySource>) -> Self {
        Self { sources }
    }

    /// Build the standard source order for a project directory
    ///
    /// 1. `local.properties` in the project root (developer-specific)
    /// 2. `overrides` (command-line `-P` values)
    /// 3. user-level `gradle.properties` (`$GRADLE_USER_HOME` or `~/.gradle`)
    /// 4. project `gradle.properties`
    ///
    /// Missing files contribute empty sources.
    pub fn for_project(root: impl AsRef<Path>, overrides: PropertySource) -> ConfigResult<Self> {
        Self::for_project_with_user_home(root, overrides, gradle_user_home().as_deref())
    }

    /// Same order as `for_project`, reading user-level properties from
    /// `user_home` instead of the environment; `None` skips that layer
    pub fn for_project_with_user_home(
        root: impl AsRef<Path>,
        overrides: PropertySource,
        user_home: Option<&Path>,
    ) -> ConfigResult<Self> {
        let root = root.as_ref();
        let mut sources = vec![
            PropertySource::load_properties_file(root.join("local.properties"))?,
            overrides,
        ];
        if let Some(user_home) = user_home {
            sources.push(PropertySource::load_properties_file(
                user_home.join("gradle.properties"),
            )?);
        }
        sources.push(PropertySource::load_properties_file(root.join("gradle.properties"))?);

        Ok(Self::new(sources))
    }

    /// The sources in priority order
    pub fn sources(&self) -> &[PropertySource] {
        &self.sources
    }

    /// Resolve `key`, `None` when no source provides a non-null value
    pub fn resolve(&self, key: &str) -> Option<String> {
        self.resolve_with_source(key).map(|r| r.value)
    }

    /// Resolve `key`, falling back to `default`
    pub fn resolve_or(&self, key: &str, default: &str) -> String {
        self.resolve(key).unwrap_or_else(|| default.to_string())
    }

    /// Resolve `key` and report which source provided it
    pub fn resolve_with_source(&self, key: &str) -> Option<ResolvedValue> {
        let found = self.sources.iter().find_map(|source| {
            source.get(key).map(|value| ResolvedValue {
                value: value.to_string(),
                source: source.name().to_string(),
            })
        });

        match &found {
            Some(r) => crate::logging::trace(
                "config_resolver",
                &format!("resolve: {} provided by {}", key, r.source),
            ),
            None => crate::logging::trace(
                "config_resolver",
                &format!("resolve: {} not found in {} sources", key, self.sources.len()),
            ),
        }
        found
    }

    /// Resolve the four connection parameters
    pub fn resolve_config(&self) -> ResolvedConfig {
        ResolvedConfig {
            connection_string: self.resolve(CONNECTION_STRING_KEY),
            container_name: self.resolve(CONTAINER_NAME_KEY),
            key_store_file_name: self.resolve(KEY_STORE_FILE_NAME_KEY),
            support_document_filename: self.resolve(SUPPORT_DOCUMENT_FILENAME_KEY),
        }
    }
}

fn gradle_user_home() -> Option<PathBuf> {
    match std::env::var_os("GRADLE_USER_HOME") {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::home_dir().map(|home| home.join(".gradle")),
    }
}
