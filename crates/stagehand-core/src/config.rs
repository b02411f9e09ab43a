use std::fs;
use std::path::{Path, PathBuf};

use dirs::config_dir;
use serde::{Deserialize, Serialize};

use crate::provider::DEFAULT_SCHEDULE_URL;

const CONFIG_DIR_NAME: &str = "stagehand";
const CONFIG_FILE_NAME: &str = "config.toml";
const CACHE_FILE_NAME: &str = "StageActivity.json";
const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Result returned by [`load_config`], capturing the source and any
/// non-fatal issues.
#[derive(Debug, Clone)]
pub struct ConfigLoadResult {
    pub config: FileConfig,
    pub warnings: Vec<String>,
    pub source: ConfigSource,
}

/// Indicates where the configuration was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// No persisted configuration was found or usable; defaults were synthesized.
    Default,
    /// Configuration was read from `config.toml`.
    File,
}

/// Errors that can occur when persisting configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Ser(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {err}"),
            ConfigError::Ser(err) => write!(f, "TOML serialization error: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Ser(value)
    }
}

/// Disk-backed configuration schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default = "FileConfig::schema_version")]
    pub schema_version: u32,
    /// Selected game client/region. Empty selects the default Official
    /// client; Bilibili shares the Official schedule.
    #[serde(default)]
    pub client_type: String,
    /// Where the schedule document is published.
    #[serde(default = "default_schedule_url")]
    pub schedule_url: String,
    /// Fixed automation-core version override, mainly for testing against
    /// unreleased cores.
    #[serde(default)]
    pub core_version: Option<String>,
}

impl FileConfig {
    fn schema_version() -> u32 {
        CURRENT_SCHEMA_VERSION
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        FileConfig {
            schema_version: CURRENT_SCHEMA_VERSION,
            client_type: String::new(),
            schedule_url: default_schedule_url(),
            core_version: None,
        }
    }
}

fn default_schedule_url() -> String {
    DEFAULT_SCHEDULE_URL.to_string()
}

pub fn config_directory() -> PathBuf {
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

pub fn config_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

/// Default location of the schedule document cache.
pub fn cache_path() -> PathBuf {
    config_directory().join("cache").join(CACHE_FILE_NAME)
}

/// Load the persisted configuration, synthesizing defaults when missing or
/// unusable. Problems surface as warnings, never as a hard failure.
pub fn load_config() -> ConfigLoadResult {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> ConfigLoadResult {
    let mut warnings = Vec::new();

    if !path.exists() {
        return ConfigLoadResult {
            config: FileConfig::default(),
            warnings,
            source: ConfigSource::Default,
        };
    }

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            warnings.push(format!(
                "unable to read {}: {err}; using defaults",
                path.display()
            ));
            return ConfigLoadResult {
                config: FileConfig::default(),
                warnings,
                source: ConfigSource::Default,
            };
        }
    };

    match toml::from_str::<FileConfig>(&raw) {
        Ok(config) => {
            if config.schema_version != CURRENT_SCHEMA_VERSION {
                warnings.push(format!(
                    "config schema version {} is newer than {CURRENT_SCHEMA_VERSION}; fields may be ignored",
                    config.schema_version
                ));
            }
            ConfigLoadResult {
                config,
                warnings,
                source: ConfigSource::File,
            }
        }
        Err(err) => {
            warnings.push(format!(
                "unable to parse {}: {err}; using defaults",
                path.display()
            ));
            ConfigLoadResult {
                config: FileConfig::default(),
                warnings,
                source: ConfigSource::Default,
            }
        }
    }
}

pub fn save_config(config: &FileConfig) -> Result<(), ConfigError> {
    save_config_to(&config_path(), config)
}

pub fn save_config_to(path: &Path, config: &FileConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(config)?;
    fs::write(path, serialized)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_synthesizes_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = load_config_from(&dir.path().join("config.toml"));
        assert_eq!(result.source, ConfigSource::Default);
        assert!(result.warnings.is_empty());
        assert_eq!(result.config.client_type, "");
        assert_eq!(result.config.schedule_url, DEFAULT_SCHEDULE_URL);
    }

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let mut config = FileConfig::default();
        config.client_type = "YoStarEN".to_string();
        config.core_version = Some("4.12.0".to_string());
        save_config_to(&path, &config).expect("saved");

        let result = load_config_from(&path);
        assert_eq!(result.source, ConfigSource::File);
        assert_eq!(result.config.client_type, "YoStarEN");
        assert_eq!(result.config.core_version.as_deref(), Some("4.12.0"));
    }

    #[test]
    fn unparseable_file_warns_and_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "client_type = [broken").expect("write");

        let result = load_config_from(&path);
        assert_eq!(result.source, ConfigSource::Default);
        assert_eq!(result.warnings.len(), 1);
    }
}
