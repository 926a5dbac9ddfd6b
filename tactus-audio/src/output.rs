//! Click output through the default cpal device.
//!
//! The device is opened lazily on the first tone. Tones are handed to the
//! audio callback over a channel and rendered there by a [`ToneMixer`].

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

use tactus_core::ToneSynth;
use tactus_types::ToneSpec;

use crate::voice::{ToneMixer, ToneVoice};

/// Set to any value to run without opening an audio device.
pub const NO_AUDIO_ENV: &str = "TACTUS_NO_AUDIO";

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no output device available")]
    NoDevice,
    #[error("failed to get output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build output stream: {0}")]
    Build(#[from] cpal::BuildStreamError),
    #[error("failed to start output stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
    #[error("unsupported sample format {0:?}")]
    UnsupportedFormat(SampleFormat),
    #[error("audio output failed earlier; re-enable sound to retry")]
    Unavailable,
    #[error("output stream closed")]
    Disconnected,
}

struct OpenStream {
    // Dropping the stream closes the device
    _stream: Stream,
    tones: Sender<ToneSpec>,
    sample_rate: u32,
}

/// [`ToneSynth`] backed by the system's default output device.
pub struct CpalToneOutput {
    stream: Option<OpenStream>,
    failed: bool,
    disabled: bool,
}

impl Default for CpalToneOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl CpalToneOutput {
    /// Nothing is opened until the first tone.
    pub fn new() -> Self {
        let disabled = std::env::var_os(NO_AUDIO_ENV).is_some();
        if disabled {
            log::info!(target: "audio", "{} set, audio output disabled", NO_AUDIO_ENV);
        }
        Self {
            stream: None,
            failed: false,
            disabled,
        }
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    pub fn sample_rate(&self) -> Option<u32> {
        self.stream.as_ref().map(|s| s.sample_rate)
    }

    /// Queue a tone, opening the device first if needed.
    pub fn play_tone(&mut self, tone: &ToneSpec) -> Result<(), AudioError> {
        if self.disabled {
            return Ok(());
        }
        if self.failed {
            return Err(AudioError::Unavailable);
        }
        if self.stream.is_none() {
            match open_default_output() {
                Ok(stream) => self.stream = Some(stream),
                Err(e) => {
                    self.failed = true;
                    return Err(e);
                }
            }
        }

        let Some(open) = self.stream.as_ref() else {
            return Err(AudioError::Unavailable);
        };
        if open.tones.send(*tone).is_err() {
            // Callback side is gone; reopen on the next attempt
            self.stream = None;
            return Err(AudioError::Disconnected);
        }
        Ok(())
    }
}

impl ToneSynth for CpalToneOutput {
    fn play(&mut self, tone: &ToneSpec) -> Result<(), String> {
        self.play_tone(tone).map_err(|e| e.to_string())
    }

    fn reset_failure(&mut self) {
        if self.failed {
            log::debug!(target: "audio", "clearing audio failure, will retry on next tone");
        }
        self.failed = false;
    }
}

fn open_default_output() -> Result<OpenStream, AudioError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
    let supported = device.default_output_config()?;
    let format = supported.sample_format();
    let config: StreamConfig = supported.into();
    let sample_rate = config.sample_rate.0;

    let (tx, rx) = crossbeam_channel::unbounded();
    let stream = match format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, rx)?,
        SampleFormat::I16 => build_stream::<i16>(&device, &config, rx)?,
        SampleFormat::U16 => build_stream::<u16>(&device, &config, rx)?,
        other => return Err(AudioError::UnsupportedFormat(other)),
    };
    stream.play()?;

    log::info!(
        target: "audio",
        "opened {} ({} Hz, {} ch, {:?})",
        device.name().unwrap_or_else(|_| "output device".into()),
        sample_rate,
        config.channels,
        format
    );

    Ok(OpenStream {
        _stream: stream,
        tones: tx,
        sample_rate,
    })
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    tones: Receiver<ToneSpec>,
) -> Result<Stream, AudioError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let sample_rate = config.sample_rate.0;
    let mut mixer = ToneMixer::new();
    let mut scratch: Vec<f32> = Vec::new();

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            while let Ok(tone) = tones.try_recv() {
                mixer.add(ToneVoice::new(&tone, sample_rate));
            }
            scratch.resize(data.len(), 0.0);
            mixer.fill(&mut scratch, channels);
            for (out, sample) in data.iter_mut().zip(scratch.iter()) {
                *out = T::from_sample(*sample);
            }
        },
        |err| {
            log::error!(target: "audio", "output stream error: {}", err);
        },
        None,
    )?;
    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_sticks_until_reset() {
        let mut out = CpalToneOutput {
            stream: None,
            failed: true,
            disabled: false,
        };
        let tone = tactus_types::tone_for_beat(1);
        assert!(matches!(out.play_tone(&tone), Err(AudioError::Unavailable)));
        assert!(out.play(&tone).is_err());
        out.reset_failure();
        assert!(!out.failed);
    }

    #[test]
    fn disabled_output_is_silent_success() {
        let mut out = CpalToneOutput {
            stream: None,
            failed: false,
            disabled: true,
        };
        assert!(out.play(&tactus_types::tone_for_beat(2)).is_ok());
        assert!(!out.is_open());
        assert_eq!(out.sample_rate(), None);
    }

    #[test]
    fn errors_render_for_status_line() {
        assert_eq!(AudioError::NoDevice.to_string(), "no output device available");
        assert!(AudioError::Unavailable.to_string().contains("re-enable sound"));
    }
}
