//! Shared CLI plumbing: exit codes, errors and registry access.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::error::BoardError;
use crate::models::Profile;
use crate::playback::PlaybackError;
use crate::services::{JsonFileStore, ProfileRegistry};

/// Process exit codes used by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Bad input or a rule of the profile model was violated
    ValidationError = 1,
    /// Reading or writing files (or the audio device) failed
    IoError = 2,
}

/// Error reported by a command, with the exit code to use.
#[derive(Debug)]
pub struct CliError {
    pub code: ExitCode,
    pub message: String,
}

impl CliError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::ValidationError,
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self {
            code: ExitCode::IoError,
            message: message.into(),
        }
    }

    /// Numeric process exit code.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.code as i32
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

impl From<BoardError> for CliError {
    fn from(err: BoardError) -> Self {
        if err.is_io() {
            Self::io(err.to_string())
        } else {
            Self::validation(err.to_string())
        }
    }
}

impl From<PlaybackError> for CliError {
    fn from(err: PlaybackError) -> Self {
        match err {
            PlaybackError::FileNotFound(_) | PlaybackError::Decode { .. } => {
                Self::validation(err.to_string())
            }
            PlaybackError::Io { .. }
            | PlaybackError::Resample(_)
            | PlaybackError::NoOutputDevice(_)
            | PlaybackError::Stream(_) => Self::io(err.to_string()),
        }
    }
}

/// Result type for CLI commands
pub type CliResult<T> = Result<T, CliError>;

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Profile store override from `--store`
    pub store: Option<PathBuf>,
}

impl GlobalOptions {
    /// Loads the configuration file.
    pub fn config(&self) -> CliResult<Config> {
        Config::load().map_err(|e| CliError::validation(format!("Failed to load configuration: {e:#}")))
    }

    /// Store path: `--store`, then the configured path, then the default.
    pub fn store_path(&self, config: &Config) -> CliResult<PathBuf> {
        match &self.store {
            Some(path) => Ok(path.clone()),
            None => config
                .store_path()
                .map_err(|e| CliError::io(format!("Failed to resolve profile store: {e:#}"))),
        }
    }

    /// Opens the profile registry on the file store.
    pub fn open_registry(&self) -> CliResult<(Config, ProfileRegistry<JsonFileStore>)> {
        let config = self.config()?;
        let path = self.store_path(&config)?;
        debug!(store = %path.display(), "opening profile store");
        let registry =
            ProfileRegistry::open(JsonFileStore::new(path), config.board.max_bindings_per_profile)?;
        Ok((config, registry))
    }
}

/// Resolves `--profile`, defaulting to the active profile.
pub fn resolve_profile<'a>(
    registry: &'a ProfileRegistry<JsonFileStore>,
    name: Option<&str>,
) -> CliResult<&'a Profile> {
    match name {
        Some(name) => registry
            .profile(name)
            .ok_or_else(|| BoardError::profile_not_found(name).into()),
        None => Ok(registry.active_profile()),
    }
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Path for display in command output.
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
