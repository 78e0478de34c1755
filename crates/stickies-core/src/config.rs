//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/stickies/config.toml)
//! 3. Environment variables (STICKIES_* prefix)
//!
//! Environment variables take precedence over config file values.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::geometry::Viewport;

/// Environment variable prefix
const ENV_PREFIX: &str = "STICKIES";

const DEFAULT_VIEWPORT_WIDTH: i32 = 1280;
const DEFAULT_VIEWPORT_HEIGHT: i32 = 800;
const DEFAULT_CELL_WIDTH: i32 = 10;
const DEFAULT_CELL_HEIGHT: i32 = 20;

/// Which key-value backend holds the notes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per key under `<data_dir>/kv`
    #[default]
    File,
    /// A `kv` table in `<data_dir>/stickies.db`
    Sqlite,
    /// Nothing is written to disk
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageBackend::File => "file",
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::Memory => "memory",
        };
        f.write_str(name)
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            other => bail!(
                "Unknown storage backend '{}'. Use 'file', 'sqlite' or 'memory'.",
                other
            ),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory for data storage
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Storage backend
    #[serde(default)]
    pub storage: StorageBackend,

    /// Viewport width used by CLI commands, in pixels
    #[serde(default = "default_viewport_width")]
    pub viewport_width: i32,

    /// Viewport height used by CLI commands, in pixels
    #[serde(default = "default_viewport_height")]
    pub viewport_height: i32,

    /// Pixels per terminal column on the board
    #[serde(default = "default_cell_width")]
    pub cell_width: i32,

    /// Pixels per terminal row on the board
    #[serde(default = "default_cell_height")]
    pub cell_height: i32,

    /// Log file for the board (defaults to {data_dir}/debug.log)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage: StorageBackend::default(),
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (STICKIES_DATA_DIR, STICKIES_STORAGE)
    /// 2. Config file (~/.config/stickies/config.toml or STICKIES_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        // STICKIES_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // STICKIES_STORAGE
        if let Ok(val) = std::env::var(format!("{}_STORAGE", ENV_PREFIX)) {
            self.storage = val
                .parse()
                .with_context(|| format!("Invalid {}_STORAGE value", ENV_PREFIX))?;
        }

        Ok(())
    }

    /// Reject sizes that would make clamping meaningless
    fn validate(&self) -> Result<()> {
        if self.viewport_width <= 0 || self.viewport_height <= 0 {
            bail!(
                "Viewport must be positive, got {}x{}",
                self.viewport_width,
                self.viewport_height
            );
        }
        if self.cell_width <= 0 || self.cell_height <= 0 {
            bail!(
                "Cell size must be positive, got {}x{}",
                self.cell_width,
                self.cell_height
            );
        }
        Ok(())
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default config file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with STICKIES_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("stickies")
            .join("config.toml")
    }

    /// Viewport used when no live window size is available
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    /// Directory for the file backend
    pub fn kv_dir(&self) -> PathBuf {
        self.data_dir.join("kv")
    }

    /// Get the path to the SQLite database
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join("stickies.db")
    }

    /// Board log file, falling back to the data directory
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join("debug.log"))
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stickies")
}

fn default_viewport_width() -> i32 {
    DEFAULT_VIEWPORT_WIDTH
}

fn default_viewport_height() -> i32 {
    DEFAULT_VIEWPORT_HEIGHT
}

fn default_cell_width() -> i32 {
    DEFAULT_CELL_WIDTH
}

fn default_cell_height() -> i32 {
    DEFAULT_CELL_HEIGHT
}
