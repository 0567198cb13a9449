//! Configuration management.
//!
//! Loads settings from a TOML file or uses defaults. Lookup order:
//! explicit path -> $CHD_CONFIG -> $XDG_CONFIG_HOME/chd/config.toml -> /etc/chd/config.toml.
//! $CHD_MODEL_PATH overrides the model path from any of them.

use crate::error::{ChdError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// System-wide config file path
pub const SYSTEM_CONFIG_PATH: &str = "/etc/chd/config.toml";

/// Artifact location relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "models/chd_pipeline.json";

pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

pub const ENV_CONFIG: &str = "CHD_CONFIG";
pub const ENV_MODEL_PATH: &str = "CHD_MODEL_PATH";

/// Model artifact settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
}

fn default_model_path() -> PathBuf {
    PathBuf::from(DEFAULT_MODEL_PATH)
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

/// Web daemon settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on (localhost only by default)
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// When to emit ANSI colour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn use_color(&self) -> bool {
        match self {
            ColorChoice::Auto => crate::display::should_use_color(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub color: ColorChoice,
}

/// Full configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Load config, then apply environment overrides.
    ///
    /// An explicit path must exist; discovered paths are optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load_from_path(path)?,
            None => Self::discover()?,
        };
        config.apply_env();
        Ok(config)
    }

    fn discover() -> Result<Self> {
        if let Ok(path) = env::var(ENV_CONFIG) {
            return Self::load_from_path(Path::new(&path));
        }
        for path in Self::search_paths() {
            if path.is_file() {
                return Self::load_from_path(&path);
            }
        }
        debug!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Candidate config files in priority order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("chd").join("config.toml"));
        }
        paths.push(PathBuf::from(SYSTEM_CONFIG_PATH));
        paths
    }

    /// Load config from specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ChdError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_toml(&content)
            .map_err(|e| ChdError::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn apply_env(&mut self) {
        if let Ok(path) = env::var(ENV_MODEL_PATH) {
            if !path.trim().is_empty() {
                self.model.path = PathBuf::from(path);
            }
        }
    }
}
