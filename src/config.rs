//! Game configuration loaded from a TOML file.
//!
//! The file is looked up at `$RECTRIS_CONFIG`, then in the platform config
//! directory (`rectris/config.toml`), then at `config/rectris.toml`. A missing
//! file is created with the defaults. Missing keys fall back to their defaults.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::types::{
    ColorMode, BASE_TICK_MS, DEFAULT_FIELD_HEIGHT, DEFAULT_FIELD_WIDTH, MIN_FIELD_WIDTH,
    TICK_SPEEDUP,
};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "RECTRIS_CONFIG";

// Fallback when the platform has no config directory
const CONFIG_FILE_PATH: &str = "config/rectris.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Field width in cells, walls included
    pub width: usize,
    /// Field height in cells
    pub height: usize,
    /// Tick interval at level 1
    pub tick_ms: u64,
    /// Factor applied to the tick interval for every level gained
    pub speedup: f64,
    /// Preview mode a new game starts in
    pub color_mode: ColorMode,
    /// Where the record table lives; defaults to the platform data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records_path: Option<PathBuf>,
    /// Fixed shape source seed; time-based when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_FIELD_WIDTH,
            height: DEFAULT_FIELD_HEIGHT,
            tick_ms: BASE_TICK_MS,
            speedup: TICK_SPEEDUP,
            color_mode: ColorMode::On,
            records_path: None,
            seed: None,
        }
    }
}

impl Config {
    /// Load from the default location, writing the defaults there if no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`, writing the defaults there if no file exists.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            info!("wrote default config to {}", path.display());
            return Ok(config);
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;
        Ok(())
    }

    /// Reject values the game cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_FIELD_WIDTH {
            return Err(ConfigError::Invalid(format!(
                "width must be at least {MIN_FIELD_WIDTH}, got {}",
                self.width
            )));
        }
        if self.height == 0 {
            return Err(ConfigError::Invalid("height must be at least 1".into()));
        }
        if self.width > u16::MAX as usize / 4 || self.height > u16::MAX as usize / 2 {
            return Err(ConfigError::Invalid(format!(
                "field {}x{} does not fit a terminal",
                self.width, self.height
            )));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be positive".into()));
        }
        if !(self.speedup > 0.0 && self.speedup <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "speedup must be in (0, 1], got {}",
                self.speedup
            )));
        }
        Ok(())
    }

    /// The configured record table path, or the platform default.
    pub fn records_path(&self) -> PathBuf {
        self.records_path.clone().unwrap_or_else(default_records_path)
    }
}

/// Path of the config file, honoring [`CONFIG_ENV_VAR`].
pub fn config_file_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }

    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("rectris").join("config.toml")
    } else {
        PathBuf::from(CONFIG_FILE_PATH)
    }
}

fn default_records_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("rectris"))
        .unwrap_or_default()
        .join("records.json")
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "config file I/O failed: {err}"),
            ConfigError::Parse(err) => write!(f, "config file is not valid TOML: {err}"),
            ConfigError::Serialize(err) => write!(f, "config could not be serialized: {err}"),
            ConfigError::Invalid(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Serialize(err) => Some(err),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize(err)
    }
}
