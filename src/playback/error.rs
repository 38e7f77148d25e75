//! Playback errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from decoding sound files or driving the audio device.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("Sound file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("Resampling failed: {0}")]
    Resample(String),

    #[error("Output device not found: {0}")]
    NoOutputDevice(String),

    #[error("Audio output error: {0}")]
    Stream(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
