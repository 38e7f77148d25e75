//! Silent playback that records what it was asked to do.

use std::path::{Path, PathBuf};

use super::error::{PlaybackError, Result};
use super::PlaybackAdapter;

/// A call received by [`RecordingPlayback`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackEvent {
    Played {
        path: PathBuf,
        volume: f32,
        looping: bool,
    },
    StoppedAll,
}

/// Playback adapter without an audio device.
///
/// Used in tests and wherever no output is wanted. Missing files still fail
/// like they would on a real device.
#[derive(Debug)]
pub struct RecordingPlayback {
    events: Vec<PlaybackEvent>,
    preloaded: Vec<PathBuf>,
    master: f32,
}

impl RecordingPlayback {
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            preloaded: Vec::new(),
            master: 1.0,
        }
    }

    #[must_use]
    pub fn events(&self) -> &[PlaybackEvent] {
        &self.events
    }

    /// Paths passed to `play`, in call order.
    #[must_use]
    pub fn played(&self) -> Vec<&Path> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PlaybackEvent::Played { path, .. } => Some(path.as_path()),
                PlaybackEvent::StoppedAll => None,
            })
            .collect()
    }

    /// Paths passed to `preload`, in call order.
    #[must_use]
    pub fn preloaded(&self) -> &[PathBuf] {
        &self.preloaded
    }

    #[must_use]
    pub fn master_volume(&self) -> f32 {
        self.master
    }
}

impl Default for RecordingPlayback {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackAdapter for RecordingPlayback {
    fn play(&mut self, path: &Path, volume: f32, looping: bool) -> Result<()> {
        if !path.is_file() {
            return Err(PlaybackError::FileNotFound(path.to_path_buf()));
        }
        self.events.push(PlaybackEvent::Played {
            path: path.to_path_buf(),
            volume: volume.clamp(0.0, 1.0),
            looping,
        });
        Ok(())
    }

    fn preload(&mut self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(PlaybackError::FileNotFound(path.to_path_buf()));
        }
        self.preloaded.push(path.to_path_buf());
        Ok(())
    }

    fn stop_all(&mut self) {
        self.events.push(PlaybackEvent::StoppedAll);
    }

    fn set_master_volume(&mut self, volume: f32) {
        self.master = volume.clamp(0.0, 1.0);
    }

    fn is_idle(&self) -> bool {
        true
    }
}
