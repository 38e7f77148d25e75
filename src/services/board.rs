//! Board controller: the profile registry wired to a playback adapter.

use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::BoardError;
use crate::models::{Hotkey, SoundBinding};
use crate::playback::{PlaybackAdapter, PlaybackError};
use crate::services::registry::ProfileRegistry;
use crate::services::store::ProfileStore;

/// Failure to play a sound from the board.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

/// What the interactive board drives: profiles, playback, volume and loop state.
pub struct Soundboard<S: ProfileStore, P: PlaybackAdapter> {
    registry: ProfileRegistry<S>,
    playback: P,
    volume: f32,
    looping: bool,
}

impl<S: ProfileStore, P: PlaybackAdapter> Soundboard<S, P> {
    pub fn new(registry: ProfileRegistry<S>, mut playback: P, volume: f32, looping: bool) -> Self {
        let volume = volume.clamp(0.0, 1.0);
        playback.set_master_volume(volume);
        let mut board = Self {
            registry,
            playback,
            volume,
            looping,
        };
        board.preload_active();
        board
    }

    #[must_use]
    pub fn registry(&self) -> &ProfileRegistry<S> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ProfileRegistry<S> {
        &mut self.registry
    }

    #[must_use]
    pub fn playback(&self) -> &P {
        &self.playback
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    #[must_use]
    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Plays the sound `name` from the active profile.
    pub fn trigger(&mut self, name: &str) -> Result<(), TriggerError> {
        let binding = self
            .registry
            .active_profile()
            .get(name)
            .ok_or_else(|| BoardError::sound_not_found(name))?;
        Self::start(&mut self.playback, binding, self.looping)?;
        Ok(())
    }

    /// Plays the active profile's sound bound to `hotkey`.
    ///
    /// Returns the name of the sound, or `None` when the hotkey is unbound.
    pub fn trigger_hotkey(&mut self, hotkey: &Hotkey) -> Result<Option<String>, TriggerError> {
        let Some(binding) = self.registry.active_profile().find_by_hotkey(hotkey) else {
            return Ok(None);
        };
        Self::start(&mut self.playback, binding, self.looping)?;
        Ok(Some(binding.name.clone()))
    }

    /// Plays a random sound from the active profile.
    pub fn play_random(&mut self) -> Result<Option<String>, TriggerError> {
        let bindings = self.registry.active_profile().bindings();
        let Some(binding) = bindings.choose(&mut rand::thread_rng()) else {
            return Ok(None);
        };
        Self::start(&mut self.playback, binding, self.looping)?;
        Ok(Some(binding.name.clone()))
    }

    /// Makes `name` the active profile and gets its sounds ready.
    pub fn switch_profile(&mut self, name: &str) -> Result<(), BoardError> {
        self.registry.set_active_profile(name)?;
        self.preload_active();
        Ok(())
    }

    /// Decodes the active profile's sounds ahead of their first press.
    ///
    /// A file that fails here is reported again when it is played.
    pub fn preload_active(&mut self) {
        for binding in self.registry.active_profile().bindings() {
            if let Err(e) = self.playback.preload(&binding.file) {
                warn!(sound = %binding.name, "preload failed: {e}");
            }
        }
    }

    pub fn stop_all(&mut self) {
        self.playback.stop_all();
    }

    /// Sets the board volume, which also applies to sounds already playing.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        self.playback.set_master_volume(self.volume);
    }

    /// Flips loop mode for sounds started from now on. Returns the new state.
    pub fn toggle_loop(&mut self) -> bool {
        self.looping = !self.looping;
        self.looping
    }

    fn start(playback: &mut P, binding: &SoundBinding, looping: bool) -> Result<(), PlaybackError> {
        debug!(sound = %binding.name, looping, "trigger");
        playback.play(&binding.file, 1.0, looping)
    }
}
