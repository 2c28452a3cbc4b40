use std::path::{Path, PathBuf};

use admin_schema::SchemaConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "admin-schema.toml";

/// Contents of `admin-schema.toml`: derivation settings plus CLI defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub cli: CliSettings,
    #[serde(flatten)]
    pub schema: SchemaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliSettings {
    /// Directory of model descriptor files used when `--models` is omitted
    #[serde(default = "default_models_dir")]
    pub models_dir: String,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
        }
    }
}

fn default_models_dir() -> String {
    "models".to_string()
}

/// Where the CLI runs: the directory holding the config file (or the current
/// directory when there is none) and the loaded configuration.
pub struct ProjectContext {
    pub root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub config: ProjectConfig,
}

impl ProjectContext {
    /// Loads `explicit` when given, else the nearest `admin-schema.toml` in the
    /// current directory or its ancestors, else the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::find_config(&current_dir) {
                Some(path) => Self::from_file(&path),
                None => Ok(Self {
                    root: current_dir,
                    config_path: None,
                    config: ProjectConfig::default(),
                }),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ProjectConfig =
            toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
        let root = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self {
            root,
            config_path: Some(path.to_path_buf()),
            config,
        })
    }

    fn find_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    /// `--models` when given, else the configured directory relative to the project root.
    pub fn models_dir(&self, explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(path) => path.to_path_buf(),
            None => self.root.join(&self.config.cli.models_dir),
        }
    }
}
