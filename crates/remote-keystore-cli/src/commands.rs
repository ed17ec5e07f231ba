use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use remote_keystore_core::resolver::{
    CONNECTION_STRING_KEY, CONTAINER_NAME_KEY, KEY_STORE_FILE_NAME_KEY, SUPPORT_DOCUMENT_FILENAME_KEY,
};
use remote_keystore_core::{
    cleanup, ConfigResolver, ConsoleLogger, CredentialAcquisitionEngine, DefaultBlobConnector,
    PropertySource, SharedLogger, SigningProperties,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Properties,
    Json,
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct ProjectOptions {
    /// Project root holding local.properties and gradle.properties
    #[arg(short = 'd', long, default_value = ".", env = "REMOTE_KEYSTORE_PROJECT_DIR")]
    pub project_dir: PathBuf,

    /// Property override, highest priority after local.properties (repeatable)
    #[arg(short = 'P', long = "property", value_name = "KEY=VALUE")]
    pub properties: Vec<String>,

    /// Directory holding the user-level gradle.properties [default: ~/.gradle]
    #[arg(short = 'g', long, env = "GRADLE_USER_HOME")]
    pub gradle_user_home: Option<PathBuf>,
}

impl ProjectOptions {
    fn resolver(&self) -> Result<ConfigResolver> {
        let overrides = PropertySource::from_overrides("command line", &self.properties)?;
        let resolver = match &self.gradle_user_home {
            Some(dir) => ConfigResolver::for_project_with_user_home(&self.project_dir, overrides, Some(dir.as_path())),
            None => ConfigResolver::for_project(&self.project_dir, overrides),
        };
        resolver.with_context(|| format!("Failed to load properties for {}", self.project_dir.display()))
    }
}

pub struct FetchCommand {
    pub project: ProjectOptions,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub timeout_secs: u64,
    pub verbose: bool,
}

impl FetchCommand {
    pub fn execute(&self) -> Result<()> {
        let rendered = self.run(Arc::new(ConsoleLogger::new().stderr_only().verbose(self.verbose)))?;
        match &self.output {
            Some(path) => fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?,
            None => print!("{}", rendered),
        }
        Ok(())
    }

    /// Resolve, acquire and render; the default identity is not an error
    fn run(&self, logger: SharedLogger) -> Result<String> {
        let config = self.project.resolver()?.resolve_config();
        let project_dir = &self.project.project_dir;

        let connector = DefaultBlobConnector::new().with_timeout(Duration::from_secs(self.timeout_secs));
        let engine = CredentialAcquisitionEngine::new(Arc::new(connector), project_dir)
            .with_logger(logger);
        let bundle = engine.acquire(&config);

        let props = SigningProperties::from_bundle(&bundle, project_dir)
            .context("Failed to write the default keystore")?;

        Ok(match self.format {
            OutputFormat::Properties => props.to_properties_string(),
            OutputFormat::Json => props.to_json()? + "\n",
        })
    }
}

pub struct CleanCommand;

impl CleanCommand {
    pub fn execute(project: &ProjectOptions) -> Result<()> {
        let config = project.resolver()?.resolve_config();
        let removed = cleanup(&project.project_dir, &config)
            .with_context(|| format!("Failed to clean {}", project.project_dir.display()))?;

        if removed.is_empty() {
            eprintln!("Nothing to remove");
        }
        for path in removed {
            eprintln!("Removed {}", path.display());
        }
        Ok(())
    }
}

pub struct ResolveCommand;

impl ResolveCommand {
    pub fn execute(project: &ProjectOptions) -> Result<()> {
        let resolver = project.resolver()?;
        print!("{}", Self::render(&resolver));
        Ok(())
    }

    fn render(resolver: &ConfigResolver) -> String {
        let mut out = String::new();
        for key in [
            CONNECTION_STRING_KEY,
            CONTAINER_NAME_KEY,
            KEY_STORE_FILE_NAME_KEY,
            SUPPORT_DOCUMENT_FILENAME_KEY,
        ] {
            let line = match resolver.resolve_with_source(key) {
                Some(r) if key == CONNECTION_STRING_KEY => {
                    format!("{} = {} ({})\n", key, mask(&r.value), r.source)
                }
                Some(r) => format!("{} = {} ({})\n", key, r.value, r.source),
                None => format!("{} is not set\n", key),
            };
            out.push_str(&line);
        }
        out
    }
}

/// Keep only the key names of a connection string
fn mask(connection_string: &str) -> String {
    connection_string
        .split(';')
        .filter(|s| !s.trim().is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((key, _)) => format!("{}=***", key),
            None => "***".to_string(),
        })
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use remote_keystore_core::signing::DEFAULT_KEYSTORE_FILE_NAME;
    use remote_keystore_core::{DebugFileLogger, MemoryLogger};
    use tempfile::TempDir;

    /// Options isolated from the user-level gradle.properties of the machine
    fn options(project_dir: &Path, user_home: &TempDir, properties: Vec<String>) -> ProjectOptions {
        ProjectOptions {
            project_dir: project_dir.to_path_buf(),
            properties,
            gradle_user_home: Some(user_home.path().to_path_buf()),
        }
    }

    fn fetch(project: ProjectOptions, format: OutputFormat) -> FetchCommand {
        FetchCommand {
            project,
            format,
            output: None,
            timeout_secs: 1,
            verbose: false,
        }
    }

    #[test]
    fn test_mask() {
        assert_eq!(
            mask("AccountName=acme;AccountKey=c2VjcmV0;"),
            "AccountName=***;AccountKey=***"
        );
        assert_eq!(mask("garbage"), "***");
    }

    #[test]
    fn test_fetch_from_file_endpoint() {
        let remote = TempDir::new().unwrap();
        let container = remote.path().join("keys");
        fs::create_dir(&container).unwrap();
        fs::write(container.join("release.jks"), b"\xfe\xed\xfe\xed").unwrap();
        fs::write(
            container.join("release.json"),
            r#"{"storePassword":"sp","keyAlias":"release","keyPassword":"kp"}"#,
        )
        .unwrap();

        let project = TempDir::new().unwrap();
        fs::write(
            project.path().join("gradle.properties"),
            format!(
                "connectionString=BlobEndpoint=file://{}\ncontainerName=keys\nkeyStoreFileName=release\nsupportDocumentFilename=release\n",
                remote.path().display()
            ),
        )
        .unwrap();

        let user_home = TempDir::new().unwrap();
        let rendered = fetch(options(project.path(), &user_home, vec![]), OutputFormat::Properties)
            .run(Arc::new(DebugFileLogger::default()))
            .unwrap();

        assert!(rendered.contains("keyAlias=release\n"));
        assert!(rendered.contains("storePassword=sp\n"));
        assert!(project.path().join("release.jks").exists());
        assert!(!project.path().join(DEFAULT_KEYSTORE_FILE_NAME).exists());
    }

    #[test]
    fn test_fetch_falls_back_without_configuration() {
        let project = TempDir::new().unwrap();
        let logger = Arc::new(MemoryLogger::new());

        let user_home = TempDir::new().unwrap();
        let project_options = options(project.path(), &user_home, vec!["containerName=keys".to_string()]);
        let rendered = fetch(project_options, OutputFormat::Json)
            .run(logger.clone())
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["isDefault"], true);
        assert!(project.path().join(DEFAULT_KEYSTORE_FILE_NAME).exists());
        assert!(logger.contains("embedded default"));
    }

    #[test]
    fn test_bad_override_is_an_error() {
        let project = TempDir::new().unwrap();
        let user_home = TempDir::new().unwrap();
        let result = fetch(options(project.path(), &user_home, vec!["oops".to_string()]), OutputFormat::Properties)
            .run(Arc::new(DebugFileLogger::default()));
        assert!(result.is_err());
    }

    #[test]
    fn test_clean_removes_files() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("release.jks"), b"x").unwrap();
        fs::write(project.path().join(DEFAULT_KEYSTORE_FILE_NAME), b"x").unwrap();

        let user_home = TempDir::new().unwrap();
        let project_options = options(project.path(), &user_home, vec!["keyStoreFileName=release".to_string()]);
        CleanCommand::execute(&project_options).unwrap();

        assert!(!project.path().join("release.jks").exists());
        assert!(!project.path().join(DEFAULT_KEYSTORE_FILE_NAME).exists());
    }

    #[test]
    fn test_user_home_ranks_above_project_properties() {
        let project = TempDir::new().unwrap();
        let user_home = TempDir::new().unwrap();
        fs::write(project.path().join("gradle.properties"), "containerName=from-project\n").unwrap();
        fs::write(user_home.path().join("gradle.properties"), "containerName=from-user\n").unwrap();

        let resolver = options(project.path(), &user_home, vec![]).resolver().unwrap();
        let resolved = resolver.resolve_with_source(CONTAINER_NAME_KEY).unwrap();

        assert_eq!(resolved.value, "from-user");
        assert_eq!(resolved.source, user_home.path().join("gradle.properties").display().to_string());
    }

    #[test]
    fn test_resolve_render() {
        let resolver = ConfigResolver::new(vec![
            PropertySource::new("local.properties").with(CONNECTION_STRING_KEY, "AccountName=acme;AccountKey=k"),
            PropertySource::new("gradle.properties").with(CONTAINER_NAME_KEY, "keys"),
        ]);

        let out = ResolveCommand::render(&resolver);
        assert!(out.contains("connectionString = AccountName=***;AccountKey=*** (local.properties)\n"));
        assert!(out.contains("containerName = keys (gradle.properties)\n"));
        assert!(out.contains("keyStoreFileName is not set\n"));
    }
}
