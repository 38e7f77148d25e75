//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and the limits of the profile model.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "Ultimate Soundboard 9000";

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "soundboard9000";

/// Environment variable that overrides the config directory (used by tests and portable installs).
pub const CONFIG_DIR_ENV: &str = "SOUNDBOARD_CONFIG_DIR";

/// Name of the reserved profile that always exists and cannot be deleted.
pub const DEFAULT_PROFILE: &str = "Default";

/// Default maximum number of sounds per profile.
pub const DEFAULT_MAX_BINDINGS: usize = 10;

/// Maximum length of a sound or profile name, in characters.
pub const MAX_NAME_LEN: usize = 64;

/// File extensions accepted for sound files (compared case-insensitively).
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "ogg", "flac"];

/// Current version of the profile store document.
pub const STORE_VERSION: u32 = 1;

/// Environment variable selecting the audio backend (`null` disables output).
pub const AUDIO_BACKEND_ENV: &str = "SOUNDBOARD_AUDIO";

/// Name of the log file written while the interactive board is running.
pub const LOG_FILE_NAME: &str = "soundboard.log";
