//! Device-independent voice mixer.
//!
//! The audio callback owns nothing but a locked [`Mixer`]; everything it
//! does is plain arithmetic on prepared clips, so the mixer is tested
//! without an audio device.

use std::sync::Arc;

use super::decoder::Clip;

/// Maximum number of clips playing at once. The oldest voice is dropped.
pub const MAX_VOICES: usize = 32;

#[derive(Debug)]
struct Voice {
    clip: Arc<Clip>,
    frame: usize,
    gain: f32,
    looping: bool,
}

impl Voice {
    fn finished(&self) -> bool {
        self.frame >= self.clip.frames()
    }
}

/// Mixes any number of overlapping clips into one interleaved buffer.
///
/// Clips must already match the mixer's channel count.
#[derive(Debug)]
pub struct Mixer {
    voices: Vec<Voice>,
    channels: usize,
    master: f32,
}

impl Mixer {
    #[must_use]
    pub fn new(channels: usize) -> Self {
        Self {
            voices: Vec::new(),
            channels: channels.max(1),
            master: 1.0,
        }
    }

    #[must_use]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Starts a clip. `gain` is clamped to `0.0..=1.0`.
    pub fn add(&mut self, clip: Arc<Clip>, gain: f32, looping: bool) {
        if clip.frames() == 0 {
            return;
        }
        if self.voices.len() >= MAX_VOICES {
            self.voices.remove(0);
        }
        self.voices.push(Voice {
            clip,
            frame: 0,
            gain: gain.clamp(0.0, 1.0),
            looping,
        });
    }

    pub fn stop_all(&mut self) {
        self.voices.clear();
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master = volume.clamp(0.0, 1.0);
    }

    #[must_use]
    pub fn master_volume(&self) -> f32 {
        self.master
    }

    #[must_use]
    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.voices.is_empty()
    }

    /// Fills `out` (interleaved) with the next block and advances every voice.
    pub fn render(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        let channels = self.channels;

        for voice in &mut self.voices {
            let voice_channels = voice.clip.channels().min(channels);

            for frame in out.chunks_exact_mut(channels) {
                if voice.finished() {
                    if voice.looping {
                        voice.frame = 0;
                    } else {
                        break;
                    }
                }
                for (ch, sample) in frame.iter_mut().enumerate().take(voice_channels) {
                    *sample += voice.clip.sample(voice.frame, ch) * voice.gain;
                }
                voice.frame += 1;
            }
        }

        self.voices.retain(|v| v.looping || !v.finished());

        let master = self.master;
        for sample in out.iter_mut() {
            *sample = (*sample * master).clamp(-1.0, 1.0);
        }
    }
}
