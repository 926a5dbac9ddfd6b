//! Click voice rendering.
//!
//! A voice is a sine oscillator with an exponential amplitude ramp, rendered
//! sample by sample on the audio callback thread.

use std::f32::consts::TAU;

use tactus_types::{ToneSpec, Waveform};

/// Max simultaneous voices; at very fast tempos older clicks are dropped.
pub const MAX_VOICES: usize = 8;

/// One sounding click.
#[derive(Debug, Clone)]
pub struct ToneVoice {
    waveform: Waveform,
    phase: f32,
    phase_inc: f32,
    amplitude: f32,
    /// Per-sample multiplier taking start_amplitude to end_amplitude
    decay: f32,
    remaining: u32,
}

impl ToneVoice {
    pub fn new(tone: &ToneSpec, sample_rate: u32) -> Self {
        let sample_rate = sample_rate.max(1) as f32;
        let total = (tone.duration.as_secs_f32() * sample_rate).round() as u32;
        let start = tone.start_amplitude.max(f32::MIN_POSITIVE);
        let end = tone.end_amplitude.max(f32::MIN_POSITIVE);
        let decay = if total > 0 {
            (end / start).powf(1.0 / total as f32)
        } else {
            1.0
        };
        Self {
            waveform: tone.waveform,
            phase: 0.0,
            phase_inc: tone.frequency_hz / sample_rate,
            amplitude: tone.start_amplitude,
            decay,
            remaining: total,
        }
    }

    /// Next sample, or `None` once the tone has ended.
    pub fn next_sample(&mut self) -> Option<f32> {
        if self.remaining == 0 {
            return None;
        }
        let sample = match self.waveform {
            Waveform::Sine => (self.phase * TAU).sin(),
        } * self.amplitude;

        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        self.amplitude *= self.decay;
        self.remaining -= 1;
        Some(sample)
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    pub fn remaining_samples(&self) -> u32 {
        self.remaining
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }
}

/// Sums active voices into an interleaved output buffer.
#[derive(Debug)]
pub struct ToneMixer {
    voices: Vec<ToneVoice>,
}

impl Default for ToneMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl ToneMixer {
    pub fn new() -> Self {
        Self {
            voices: Vec::with_capacity(MAX_VOICES),
        }
    }

    pub fn add(&mut self, voice: ToneVoice) {
        if self.voices.len() >= MAX_VOICES {
            self.voices.remove(0);
        }
        self.voices.push(voice);
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Fill `out` (interleaved, `channels` wide) with the mixed voices. The
    /// same mono signal goes to every channel.
    pub fn fill(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in out.chunks_mut(channels) {
            let mut mixed = 0.0;
            for voice in &mut self.voices {
                if let Some(s) = voice.next_sample() {
                    mixed += s;
                }
            }
            let mixed = mixed.clamp(-1.0, 1.0);
            for sample in frame.iter_mut() {
                *sample = mixed;
            }
        }
        self.voices.retain(|v| !v.is_finished());
    }
}
