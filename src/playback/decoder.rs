//! Decoding sound files into in-memory clips.
//!
//! Files are decoded in full with Symphonia. Soundboard clips are short, so
//! a decoded clip is kept as one interleaved `f32` buffer and converted once
//! to the output device's rate and channel count.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use rubato::{FastFixedIn, PolynomialDegree, Resampler};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use super::error::{PlaybackError, Result};

/// Input frames per resampler call.
const RESAMPLE_CHUNK: usize = 1024;

/// Decoded audio: interleaved samples in `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    samples: Vec<f32>,
    channels: usize,
    sample_rate: u32,
}

impl Clip {
    /// Wraps interleaved samples. A trailing partial frame is dropped.
    #[must_use]
    pub fn new(mut samples: Vec<f32>, channels: usize, sample_rate: u32) -> Self {
        let channels = channels.max(1);
        samples.truncate(samples.len() - samples.len() % channels);
        Self {
            samples,
            channels,
            sample_rate: sample_rate.max(1),
        }
    }

    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    #[must_use]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames (samples per channel).
    #[must_use]
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames() as f64 / f64::from(self.sample_rate))
    }

    /// Sample of `channel` at `frame`.
    #[inline]
    #[must_use]
    pub fn sample(&self, frame: usize, channel: usize) -> f32 {
        self.samples[frame * self.channels + channel]
    }

    /// Converts to the given rate and channel count.
    pub fn prepare(self, sample_rate: u32, channels: usize) -> Result<Self> {
        let clip = if self.sample_rate == sample_rate {
            self
        } else {
            self.resample(sample_rate)?
        };
        Ok(if clip.channels == channels {
            clip
        } else {
            clip.map_channels(channels)
        })
    }

    /// Converts the sample rate with rubato's polynomial resampler.
    ///
    /// The whole clip is fed through in chunks, then the resampler's delay
    /// is trimmed so the output lines up with the input and lasts as long.
    pub fn resample(&self, sample_rate: u32) -> Result<Self> {
        let sample_rate = sample_rate.max(1);
        let frames = self.frames();
        if sample_rate == self.sample_rate || frames == 0 {
            return Ok(Self {
                sample_rate,
                ..self.clone()
            });
        }

        let ratio = f64::from(sample_rate) / f64::from(self.sample_rate);
        let mut resampler = FastFixedIn::<f32>::new(
            ratio,
            1.0,
            PolynomialDegree::Linear,
            RESAMPLE_CHUNK.min(frames),
            self.channels,
        )
        .map_err(|e| PlaybackError::Resample(e.to_string()))?;

        let input = self.deinterleave();
        let delay = resampler.output_delay();
        let expected = ((frames as f64) * ratio).round().max(1.0) as usize;
        let mut output: Vec<Vec<f32>> = vec![Vec::with_capacity(expected + delay); self.channels];

        let mut pos = 0;
        while pos < frames {
            let end = pos + resampler.input_frames_next();
            let block = if end <= frames {
                let chunk: Vec<&[f32]> = input.iter().map(|ch| &ch[pos..end]).collect();
                resampler.process(&chunk, None)
            } else {
                let chunk: Vec<&[f32]> = input.iter().map(|ch| &ch[pos..]).collect();
                resampler.process_partial(Some(&chunk), None)
            }
            .map_err(|e| PlaybackError::Resample(e.to_string()))?;
            append_block(&mut output, block);
            pos = end;
        }

        // Push silence through until the delayed tail has come out
        let empty: &[f32] = &[];
        let silence = vec![empty; self.channels];
        while output[0].len() < expected + delay {
            let block = resampler
                .process_partial(Some(&silence), None)
                .map_err(|e| PlaybackError::Resample(e.to_string()))?;
            if block.first().map_or(true, Vec::is_empty) {
                break;
            }
            append_block(&mut output, block);
        }

        for channel in &mut output {
            channel.drain(..delay.min(channel.len()));
            channel.resize(expected, 0.0);
        }

        let mut samples = Vec::with_capacity(expected * self.channels);
        for frame in 0..expected {
            samples.extend(output.iter().map(|ch| ch[frame]));
        }

        Ok(Self {
            samples,
            channels: self.channels,
            sample_rate,
        })
    }

    /// One buffer per channel.
    fn deinterleave(&self) -> Vec<Vec<f32>> {
        (0..self.channels)
            .map(|ch| {
                self.samples
                    .iter()
                    .skip(ch)
                    .step_by(self.channels)
                    .copied()
                    .collect()
            })
            .collect()
    }

    /// Maps source channels onto `channels` outputs.
    ///
    /// Output channel `n` plays source channel `n`; outputs past the last
    /// source channel repeat it, so mono reaches every speaker.
    #[must_use]
    pub fn map_channels(&self, channels: usize) -> Self {
        let channels = channels.max(1);
        let frames = self.frames();
        let mut samples = Vec::with_capacity(frames * channels);
        for frame in 0..frames {
            for ch in 0..channels {
                samples.push(self.sample(frame, ch.min(self.channels - 1)));
            }
        }
        Self {
            samples,
            channels,
            sample_rate: self.sample_rate,
        }
    }
}

fn append_block(output: &mut [Vec<f32>], block: Vec<Vec<f32>>) {
    for (channel, data) in output.iter_mut().zip(block) {
        channel.extend(data);
    }
}

/// Decodes a whole file into a clip at its native rate and channel count.
pub fn decode_file(path: &Path) -> Result<Clip> {
    if !path.exists() {
        return Err(PlaybackError::FileNotFound(path.to_path_buf()));
    }
    let decode_err = |reason: String| PlaybackError::Decode {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|source| PlaybackError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| decode_err(format!("unrecognized format: {e}")))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| decode_err("no audio track".to_string()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(44_100);
    let mut channels = track.codec_params.channels.map_or(0, |c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| decode_err(format!("unsupported codec: {e}")))?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(decode_err(e.to_string())),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // A corrupt packet is skipped, not fatal
            Err(SymphoniaError::DecodeError(e)) => {
                debug!(path = %path.display(), "skipping bad packet: {e}");
                continue;
            }
            Err(e) => return Err(decode_err(e.to_string())),
        };

        let spec = *decoded.spec();
        sample_rate = spec.rate;
        channels = spec.channels.count();

        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buf.samples());
    }

    if channels == 0 {
        return Err(decode_err("no audio channels".to_string()));
    }

    let clip = Clip::new(samples, channels, sample_rate);
    debug!(
        path = %path.display(),
        frames = clip.frames(),
        channels,
        sample_rate,
        "decoded clip"
    );
    Ok(clip)
}
