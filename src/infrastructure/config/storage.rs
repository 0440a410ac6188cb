//! Loads and persists [`RemoteImageListConfig`] as TOML under a
//! platform-appropriate configuration directory.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{info, warn};

use super::app_config::RemoteImageListConfig;
use crate::domain::errors::ConfigError;

const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "linuxmobile";
const APP_NAME: &str = "remote-image-prefetch";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolves the configuration directory and loads/persists the pipeline's
/// configuration file within it.
pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Creates a `StorageManager` rooted at the platform's default
    /// configuration directory for this application.
    ///
    /// # Errors
    /// Returns [`ConfigError::ConfigDirNotFound`] if the platform has no
    /// resolvable home/config directory.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::ConfigDirNotFound)?;

        Ok(Self { config_dir })
    }

    /// Creates a `StorageManager` rooted at an explicit directory (used in
    /// tests, and when a caller passes `--config` pointing elsewhere).
    #[must_use]
    pub fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    /// Returns the configuration directory path.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Ensures the configuration directory exists.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the directory cannot be created.
    pub fn ensure_config_dir(&self) -> Result<(), ConfigError> {
        if !self.config_dir.exists() {
            info!(dir = %self.config_dir.display(), "creating configuration directory");
            fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Loads the pipeline configuration, writing a default file on first run.
    ///
    /// An explicit `path_override` (e.g. from a `--config` flag) bypasses
    /// the platform default location. Deliberately does not fall back to
    /// defaults on a parse error: a malformed config is a configuration
    /// author's mistake that should surface, not be silently papered over
    /// (`InvalidKey`/`InvalidValue`, `SPEC_FULL.md` §6).
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] on a filesystem failure,
    /// [`ConfigError::InvalidKey`] if the file contains a key the `"list"`
    /// section doesn't recognize, or [`ConfigError::TomlDe`] for any other
    /// parse failure.
    pub fn load_config(
        &self,
        path_override: Option<&Path>,
    ) -> Result<RemoteImageListConfig, ConfigError> {
        self.ensure_config_dir()?;
        let config_path = path_override.map_or_else(
            || self.config_dir.join(CONFIG_FILE_NAME),
            Path::to_path_buf,
        );

        if !config_path.exists() {
            info!(path = %config_path.display(), "config file not found, writing default");
            let default_config = RemoteImageListConfig::default();
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            Self::save_to_file(&config_path, &default_config)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&config_path)?;
        toml::from_str(&content).map_err(classify_toml_error)
    }

    /// Persists `config` to this manager's configuration file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] or [`ConfigError::TomlSer`] on failure.
    pub fn save_config(&self, config: &RemoteImageListConfig) -> Result<(), ConfigError> {
        self.ensure_config_dir()?;
        let config_path = self.config_dir.join(CONFIG_FILE_NAME);
        Self::save_to_file(&config_path, config)
    }

    fn save_to_file<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(data)?;

        let parent = path
            .parent()
            .ok_or_else(|| std::io::Error::other("config path has no parent directory"))?;
        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.persist(path).map_err(|e| e.error)?;

        Ok(())
    }
}

/// Distinguishes an unrecognized key (`deny_unknown_fields`) from any other
/// TOML parse failure, so the former surfaces as [`ConfigError::InvalidKey`]
/// per `SPEC_FULL.md` §6 rather than the generic [`ConfigError::TomlDe`].
///
/// `toml::de::Error` has no structured "unknown field" variant to match on,
/// only a rendered message, so this inspects that message for serde's fixed
/// `unknown field \`...\`` wording.
fn classify_toml_error(error: toml::de::Error) -> ConfigError {
    const MARKER: &str = "unknown field `";
    let message = error.to_string();
    if let Some(start) = message.find(MARKER) {
        let rest = &message[start + MARKER.len()..];
        if let Some(end) = rest.find('`') {
            return ConfigError::InvalidKey(rest[..end].to_string());
        }
    }
    ConfigError::TomlDe(error)
}
