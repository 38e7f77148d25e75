//! Error types for profile and sound management.
//!
//! Every failure of the registry or the store is one of these variants.
//! All of them are recoverable at the UI boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the profile registry and persistence store.
#[derive(Debug, Error)]
pub enum BoardError {
    /// A profile with this name already exists
    #[error("Profile '{0}' already exists")]
    DuplicateProfile(String),

    /// The reserved profile cannot be deleted
    #[error("Profile '{0}' is protected and cannot be deleted")]
    ProtectedProfile(String),

    /// A profile or sound does not exist
    #[error("{what} '{name}' not found")]
    NotFound {
        /// "Profile" or "Sound"
        what: &'static str,
        /// The name that was looked up
        name: String,
    },

    /// A sound with this name already exists in the profile
    #[error("Sound '{name}' already exists in profile '{profile}'")]
    DuplicateName {
        /// Owning profile
        profile: String,
        /// Conflicting sound name
        name: String,
    },

    /// The hotkey is already bound in the profile
    #[error("Hotkey {hotkey} is already bound to '{bound_to}' in profile '{profile}'")]
    DuplicateHotkey {
        /// Owning profile
        profile: String,
        /// Canonical hotkey
        hotkey: String,
        /// Sound currently holding the hotkey
        bound_to: String,
    },

    /// The path is not a readable audio file
    #[error("Invalid sound file {}: {reason}", path.display())]
    InvalidFile {
        /// Offending path
        path: PathBuf,
        /// Human readable reason
        reason: String,
    },

    /// The profile reached its configured sound limit
    #[error("Profile '{profile}' is full ({max} sounds maximum)")]
    ProfileFull {
        /// Owning profile
        profile: String,
        /// Configured per-profile maximum
        max: usize,
    },

    /// The store document exists but cannot be understood
    #[error("Profile store {} is corrupt: {reason}", path.display())]
    CorruptStore {
        /// Store location
        path: PathBuf,
        /// Parse or validation failure
        reason: String,
    },

    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A profile or sound name is empty or too long
    #[error("Invalid name '{name}': {reason}")]
    InvalidName {
        /// Rejected name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// A hotkey string could not be parsed
    #[error("Invalid hotkey '{input}': {reason}")]
    InvalidHotkey {
        /// Rejected input
        input: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Fieldless discriminant of [`BoardError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DuplicateProfile,
    ProtectedProfile,
    NotFound,
    DuplicateName,
    DuplicateHotkey,
    InvalidFile,
    ProfileFull,
    CorruptStore,
    IoFailure,
    InvalidName,
    InvalidHotkey,
}

impl BoardError {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateProfile(_) => ErrorKind::DuplicateProfile,
            Self::ProtectedProfile(_) => ErrorKind::ProtectedProfile,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::DuplicateName { .. } => ErrorKind::DuplicateName,
            Self::DuplicateHotkey { .. } => ErrorKind::DuplicateHotkey,
            Self::InvalidFile { .. } => ErrorKind::InvalidFile,
            Self::ProfileFull { .. } => ErrorKind::ProfileFull,
            Self::CorruptStore { .. } => ErrorKind::CorruptStore,
            Self::Io { .. } => ErrorKind::IoFailure,
            Self::InvalidName { .. } => ErrorKind::InvalidName,
            Self::InvalidHotkey { .. } => ErrorKind::InvalidHotkey,
        }
    }

    pub(crate) fn profile_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            what: "Profile",
            name: name.into(),
        }
    }

    pub(crate) fn sound_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            what: "Sound",
            name: name.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True for errors caused by the file system rather than by user input.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::CorruptStore { .. })
    }
}

/// Result type for registry and store operations
pub type Result<T> = std::result::Result<T, BoardError>;
