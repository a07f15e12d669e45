//! Picker configuration
//!
//! The construction options the picker recognizes, plus TOML persistence
//! for host applications that keep named picker profiles on disk (one
//! profile per form, e.g. a checkout form's bounds and time step).

use chrono::{Local, NaiveDateTime};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::selection::Bounds;

/// Default minute granularity of the time wheel.
pub const DEFAULT_STEP_MINUTES: u32 = 10;

/// Error type for profile persistence
#[derive(Debug)]
pub enum ConfigError {
    /// No per-user config directory on this platform
    NoConfigDir,
    /// IO error while reading/writing a profile
    Io(io::Error),
    /// Profile file exists but is not valid TOML for a picker config
    Parse(toml::de::Error),
    /// Config could not be serialized to TOML
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "no config directory for picker profiles"),
            ConfigError::Io(e) => write!(f, "profile IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "profile parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "profile serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

/// Options fixed at session construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Minute step of the time wheel; `1440 / step_minutes` slots are
    /// generated, truncating any fractional remainder.
    pub step_minutes: u32,
    /// Earliest selectable instant.
    pub min_date: Option<NaiveDateTime>,
    /// Latest selectable instant.
    pub max_date: Option<NaiveDateTime>,
    /// Derive `min_date` from the current time at initialization.
    pub min_date_is_now: bool,
    /// Derive `max_date` from the current time at initialization.
    pub max_date_is_now: bool,
    /// Cosmetic format hint forwarded to the surface; never parsed.
    pub display_format_hint: String,
    /// Added to the panel's base z-index of 1000.
    pub base_z_index: i32,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            step_minutes: DEFAULT_STEP_MINUTES,
            min_date: None,
            max_date: None,
            min_date_is_now: false,
            max_date_is_now: false,
            display_format_hint: "dd/mm/yyyy hh:mm".to_string(),
            base_z_index: 0,
        }
    }
}

impl PickerConfig {
    /// Resolves the effective bounds, reading the clock for the `*_is_now`
    /// flags. Called once when the session is built.
    pub fn resolve_bounds(&self) -> Bounds {
        let now = Local::now().naive_local();
        Bounds {
            min: if self.min_date_is_now {
                Some(now)
            } else {
                self.min_date
            },
            max: if self.max_date_is_now {
                Some(now)
            } else {
                self.max_date
            },
        }
    }

    /// Loads a named profile from the user config directory.
    ///
    /// Returns `None` if the profile doesn't exist yet. Returns an error
    /// if the file exists but can't be parsed.
    pub fn load(profile: &str) -> Result<Option<Self>, ConfigError> {
        let path = config_path(profile).ok_or(ConfigError::NoConfigDir)?;
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    /// Reads a profile from an explicit TOML file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves this configuration as a named profile in the user config
    /// directory.
    pub fn save(&self, profile: &str) -> Result<(), ConfigError> {
        let path = config_path(profile).ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Writes this configuration to an explicit TOML file, creating parent
    /// directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Get the base configuration directory for picker profiles
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "wheel-picker", "pickers")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the configuration file path for a named picker profile
pub fn config_path(profile: &str) -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(format!("{}.toml", profile)))
}
