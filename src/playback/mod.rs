//! Sound playback.
//!
//! The rest of the application only talks to [`PlaybackAdapter`]. The real
//! implementation is [`AudioEngine`] (Symphonia decoding, cpal output);
//! [`RecordingPlayback`] stands in where no audio device is wanted.

pub mod cache;
pub mod decoder;
pub mod engine;
pub mod error;
pub mod mixer;
pub mod recording;

use std::path::Path;

pub use cache::ClipCache;
pub use decoder::{decode_file, Clip};
pub use engine::{default_output_device, list_output_devices, AudioEngine};
pub use error::PlaybackError;
pub use mixer::Mixer;
pub use recording::{PlaybackEvent, RecordingPlayback};

/// Fire-and-forget sound output.
///
/// `play` returns as soon as the clip has started, and overlapping calls
/// play at the same time. Nothing here blocks on the clip finishing.
pub trait PlaybackAdapter {
    /// Starts playing `path` at `volume` (`0.0..=1.0`), optionally looping.
    fn play(&mut self, path: &Path, volume: f32, looping: bool) -> error::Result<()>;

    /// Gets `path` ready so a later `play` starts without decoding.
    fn preload(&mut self, _path: &Path) -> error::Result<()> {
        Ok(())
    }

    /// Silences everything that is playing.
    fn stop_all(&mut self);

    /// Scales all output (`0.0..=1.0`).
    fn set_master_volume(&mut self, volume: f32);

    /// True when nothing is playing.
    fn is_idle(&self) -> bool;
}

/// Opens the audio device unless the environment asks for silent output.
///
/// Setting `SOUNDBOARD_AUDIO=null` selects [`RecordingPlayback`].
pub fn open_adapter(device: Option<&str>) -> error::Result<Box<dyn PlaybackAdapter>> {
    if std::env::var(crate::constants::AUDIO_BACKEND_ENV).is_ok_and(|v| v == "null") {
        tracing::info!("audio output disabled, using silent playback");
        return Ok(Box::new(RecordingPlayback::new()));
    }
    Ok(Box::new(AudioEngine::open(device)?))
}

impl<P: PlaybackAdapter + ?Sized> PlaybackAdapter for Box<P> {
    fn play(&mut self, path: &Path, volume: f32, looping: bool) -> error::Result<()> {
        (**self).play(path, volume, looping)
    }

    fn preload(&mut self, path: &Path) -> error::Result<()> {
        (**self).preload(path)
    }

    fn stop_all(&mut self) {
        (**self).stop_all();
    }

    fn set_master_volume(&mut self, volume: f32) {
        (**self).set_master_volume(volume);
    }

    fn is_idle(&self) -> bool {
        (**self).is_idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_recording_playback() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("air.wav");
        fs::write(&path, b"RIFF").unwrap();

        let mut playback = RecordingPlayback::new();
        playback.play(&path, 1.5, true).unwrap();
        playback.stop_all();

        assert_eq!(
            playback.events(),
            &[
                PlaybackEvent::Played {
                    path: path.clone(),
                    volume: 1.0,
                    looping: true,
                },
                PlaybackEvent::StoppedAll,
            ]
        );
        assert!(matches!(
            playback.play(&dir.path().join("gone.wav"), 1.0, false),
            Err(PlaybackError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_boxed_adapter_forwards() {
        let mut boxed: Box<dyn PlaybackAdapter> = Box::new(RecordingPlayback::new());
        boxed.set_master_volume(0.3);
        assert!(boxed.is_idle());
    }
}
