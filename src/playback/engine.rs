//! Audio output through cpal.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use tracing::{debug, info, warn};

use super::cache::ClipCache;
use super::error::{PlaybackError, Result};
use super::mixer::Mixer;
use super::PlaybackAdapter;

/// Plays sounds on an output device.
///
/// Decoded clips are cached per path, already converted to the device
/// format, so repeated presses of the same button start instantly.
pub struct AudioEngine {
    mixer: Arc<Mutex<Mixer>>,
    cache: ClipCache,
    device_name: String,
    _stream: cpal::Stream,
}

impl AudioEngine {
    /// Opens `device` by name, or the host's default output device.
    pub fn open(device: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();
        let device = match device {
            Some(name) => host
                .output_devices()
                .map_err(stream_err)?
                .find(|d| d.name().is_ok_and(|n| n == name))
                .ok_or_else(|| PlaybackError::NoOutputDevice(name.to_string()))?,
            None => host
                .default_output_device()
                .ok_or_else(|| PlaybackError::NoOutputDevice("default".to_string()))?,
        };
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let supported = device.default_output_config().map_err(stream_err)?;
        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        let channels = usize::from(config.channels);
        let sample_rate = config.sample_rate.0;

        let mixer = Arc::new(Mutex::new(Mixer::new(channels)));
        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, Arc::clone(&mixer)),
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, Arc::clone(&mixer)),
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, Arc::clone(&mixer)),
            other => Err(PlaybackError::Stream(format!(
                "unsupported sample format {other:?}"
            ))),
        }?;
        stream.play().map_err(stream_err)?;

        info!(
            device = %device_name,
            sample_rate,
            channels,
            format = ?sample_format,
            "audio output started"
        );

        Ok(Self {
            mixer,
            cache: ClipCache::new(sample_rate, channels),
            device_name,
            _stream: stream,
        })
    }

    #[must_use]
    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    fn mixer(&self) -> MutexGuard<'_, Mixer> {
        self.mixer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PlaybackAdapter for AudioEngine {
    fn play(&mut self, path: &Path, volume: f32, looping: bool) -> Result<()> {
        let clip = self.cache.get(path)?;
        self.mixer().add(clip, volume, looping);
        debug!(path = %path.display(), volume, looping, "playing");
        Ok(())
    }

    fn preload(&mut self, path: &Path) -> Result<()> {
        self.cache.get(path).map(|_| ())
    }

    fn stop_all(&mut self) {
        self.mixer().stop_all();
    }

    fn set_master_volume(&mut self, volume: f32) {
        self.mixer().set_master_volume(volume);
    }

    fn is_idle(&self) -> bool {
        self.mixer().is_idle()
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mixer: Arc<Mutex<Mixer>>,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let mut scratch: Vec<f32> = Vec::new();
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                scratch.resize(data.len(), 0.0);
                mixer
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .render(&mut scratch);
                for (out, &sample) in data.iter_mut().zip(&scratch) {
                    *out = T::from_sample(sample);
                }
            },
            |err| warn!("output stream error: {err}"),
            None,
        )
        .map_err(stream_err)
}

fn stream_err(err: impl std::fmt::Display) -> PlaybackError {
    PlaybackError::Stream(err.to_string())
}

/// Names of the available output devices, sorted.
pub fn list_output_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();
    let mut devices: Vec<String> = host
        .output_devices()
        .map_err(stream_err)?
        .filter_map(|d| d.name().ok())
        .collect();
    devices.sort();
    Ok(devices)
}

/// Name of the host's default output device, if there is one.
#[must_use]
pub fn default_output_device() -> Option<String> {
    cpal::default_host()
        .default_output_device()
        .and_then(|d| d.name().ok())
}
