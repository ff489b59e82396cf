use crate::error::{BuilderError, Result};
use crate::model::ArtifactKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Configuration for the output store, stored in `<output root>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Whether CLI writes take a backup of the previous file by default
    #[serde(default = "default_true")]
    pub create_backups: bool,

    /// Content subfolders created when the store is opened
    #[serde(default = "default_typed_subdirs")]
    pub typed_subdirs: Vec<String>,

    /// Append a new version record when a historical version is restored
    #[serde(default)]
    pub record_restored_versions: bool,

    /// Pretty-print the version history document
    #[serde(default = "default_true")]
    pub pretty_history: bool,
}

fn default_true() -> bool {
    true
}

fn default_typed_subdirs() -> Vec<String> {
    ArtifactKind::ALL
        .iter()
        .map(|kind| kind.subdir().to_string())
        .collect()
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            create_backups: true,
            typed_subdirs: default_typed_subdirs(),
            record_restored_versions: false,
            pretty_history: true,
        }
    }
}

impl BuilderConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(&config_path).map_err(|e| BuilderError::io(CONFIG_FILENAME, e))?;
        let config: BuilderConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(|e| BuilderError::io(CONFIG_FILENAME, e))?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content).map_err(|e| BuilderError::io(CONFIG_FILENAME, e))?;
        Ok(())
    }

    /// Keys accepted by `get`/`set`, in display order.
    pub const KEYS: [&'static str; 4] = [
        "create-backups",
        "typed-subdirs",
        "record-restored-versions",
        "pretty-history",
    ];

    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "create-backups" => Ok(self.create_backups.to_string()),
            "typed-subdirs" => Ok(self.typed_subdirs.join(",")),
            "record-restored-versions" => Ok(self.record_restored_versions.to_string()),
            "pretty-history" => Ok(self.pretty_history.to_string()),
            other => Err(BuilderError::Config(format!("Unknown config key: {}", other))),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "create-backups" => self.create_backups = parse_bool(key, value)?,
            "typed-subdirs" => {
                self.typed_subdirs = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "record-restored-versions" => self.record_restored_versions = parse_bool(key, value)?,
            "pretty-history" => self.pretty_history = parse_bool(key, value)?,
            other => {
                return Err(BuilderError::Config(format!(
                    "Unknown config key: {}",
                    other
                )))
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(BuilderError::Config(format!(
            "Invalid value for {}: {} (expected true or false)",
            key, value
        ))),
    }
}
