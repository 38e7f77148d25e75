//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIG_DIR_ENV, CONFIG_DIR_NAME, DEFAULT_MAX_BINDINGS, LOG_FILE_NAME};

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Profile store file (defaults to `profiles.json` in the config directory)
    #[serde(default)]
    pub store_file: Option<PathBuf>,
}

/// Limits of the profile model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Maximum number of sounds in one profile
    #[serde(default = "default_max_bindings")]
    pub max_bindings_per_profile: usize,
}

fn default_max_bindings() -> usize {
    DEFAULT_MAX_BINDINGS
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            max_bindings_per_profile: default_max_bindings(),
        }
    }
}

/// Audio output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Master volume, 0.0 to 1.0
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Whether sounds started from the board loop until stopped
    #[serde(default)]
    pub loop_playback: bool,
    /// Output device name (host default when unset)
    #[serde(default)]
    pub output_device: Option<String>,
}

fn default_volume() -> f32 {
    0.7
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            loop_playback: false,
            output_device: None,
        }
    }
}

/// User interface preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Buttons per row on the board
    #[serde(default = "default_grid_columns")]
    pub grid_columns: usize,
    /// Show the key help when the board opens
    #[serde(default = "default_true")]
    pub show_help_on_startup: bool,
}

fn default_grid_columns() -> usize {
    3
}

fn default_true() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            grid_columns: default_grid_columns(),
            show_help_on_startup: true,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    ///
    /// `$SOUNDBOARD_CONFIG_DIR` takes precedence when set. Otherwise:
    ///
    /// - Linux: `~/.config/soundboard9000/`
    /// - macOS: `~/Library/Application Support/soundboard9000/`
    /// - Windows: `%APPDATA%\soundboard9000\`
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Log file used while the interactive board owns the terminal.
    pub fn log_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(LOG_FILE_NAME))
    }

    /// Profile store location: the configured override or `profiles.json`.
    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.paths.store_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("profiles.json")),
        }
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the config file.
    ///
    /// Creates the config directory if it doesn't exist.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = path.with_extension("toml.tmp");

        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp config file: {}", temp_path.display())
        })?;

        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename temp config file to: {}", path.display()))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - volume is between 0.0 and 1.0
    /// - at least one sound per profile is allowed
    /// - at least one grid column
    pub fn validate(&self) -> Result<()> {
        let volume = self.playback.volume;
        if !(0.0..=1.0).contains(&volume) {
            anyhow::bail!("Volume must be between 0.0 and 1.0 (got {volume})");
        }
        if self.board.max_bindings_per_profile == 0 {
            anyhow::bail!("max_bindings_per_profile must be at least 1");
        }
        if self.ui.grid_columns == 0 {
            anyhow::bail!("grid_columns must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_new() {
        let config = Config::new();
        assert_eq!(config.paths.store_file, None);
        assert_eq!(config.board.max_bindings_per_profile, 10);
        assert!((config.playback.volume - 0.7).abs() < f32::EPSILON);
        assert!(!config.playback.loop_playback);
        assert_eq!(config.ui.grid_columns, 3);
        assert!(config.ui.show_help_on_startup);
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::new();
        assert!(config.validate().is_ok());

        config.playback.volume = 1.5;
        assert!(config.validate().is_err());
        config.playback.volume = 1.0;

        config.board.max_bindings_per_profile = 0;
        assert!(config.validate().is_err());
        config.board.max_bindings_per_profile = 1;

        config.ui.grid_columns = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::new();
        config.playback.volume = 0.25;
        config.playback.output_device = Some("Speakers".to_string());
        config.ui.grid_columns = 5;
        config.paths.store_file = Some(temp_dir.path().join("mine.json"));

        config.save_to(&config_file).unwrap();
        assert!(!config_file.with_extension("toml.tmp").exists());

        let loaded = Config::load_from(&config_file).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(loaded, Config::new());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        fs::write(&config_file, "[playback]\nvolume = 0.3\n").unwrap();

        let loaded = Config::load_from(&config_file).unwrap();
        assert!((loaded.playback.volume - 0.3).abs() < f32::EPSILON);
        assert_eq!(loaded.board.max_bindings_per_profile, 10);
        assert_eq!(loaded.ui.grid_columns, 3);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");

        fs::write(&config_file, "[playback\n").unwrap();
        assert!(Config::load_from(&config_file).is_err());

        fs::write(&config_file, "[playback]\nvolume = 4.0\n").unwrap();
        assert!(Config::load_from(&config_file).is_err());
    }

    #[test]
    fn test_store_path_override() {
        let mut config = Config::new();
        config.paths.store_file = Some(PathBuf::from("/tmp/board.json"));
        assert_eq!(config.store_path().unwrap(), PathBuf::from("/tmp/board.json"));
    }
}
