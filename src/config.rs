//! User configuration (`config.toml`)

use crate::scanner::DetectionMode;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CACHE_FILE: &str = "cache.json";
const PREFERENCE_FILE: &str = "folder.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documents are files whose name ends with `.<extension>`
    pub extension: String,
    /// How signature dictionaries are recognised
    pub detection: DetectionMode,
    /// Detection cache location (default: data directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<PathBuf>,
    /// Folder preference location (default: data directory)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preference_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extension: "pdf".to_string(),
            detection: DetectionMode::default(),
            cache_file: None,
            preference_file: None,
        }
    }
}

impl Config {
    /// Load config from disk, falling back to defaults on any error
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                tracing::warn!(error = %e, "using default configuration");
                Self::default()
            }
        }
    }

    /// Load config, writing the defaults first if no file exists
    pub fn load_or_create() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_or_create_at(&path),
            Err(e) => {
                tracing::warn!(error = %e, "using default configuration");
                Self::default()
            }
        }
    }

    /// Load the config file at `path`; a missing or invalid file yields defaults
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "using default configuration");
                Self::default()
            }
        }
    }

    /// [`Config::load_from`], writing the defaults to `path` first if it does not exist
    pub fn load_or_create_at(path: &Path) -> Self {
        if !path.exists() {
            if let Err(e) = Self::default().save_to(path) {
                tracing::warn!(error = %e, "failed to write default configuration");
            }
        }
        Self::load_from(path)
    }

    fn try_load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }
        fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }

    /// Location of `config.toml`
    pub fn config_path() -> Result<PathBuf> {
        let dirs = project_dirs().context("Could not determine the configuration directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache_file.clone().unwrap_or_else(|| data_dir().join(CACHE_FILE))
    }

    pub fn preference_path(&self) -> PathBuf {
        self.preference_file
            .clone()
            .unwrap_or_else(|| data_dir().join(PREFERENCE_FILE))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "sigscan")
}

/// Platform data directory, or the working directory when none is known
fn data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
