//! Click tone parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::is_accent;

/// Pitch of the accented downbeat.
pub const ACCENT_FREQ_HZ: f32 = 1000.0;
/// Pitch of the weak beats.
pub const BEAT_FREQ_HZ: f32 = 800.0;
/// Envelope starts here...
pub const TONE_START_AMPLITUDE: f32 = 0.3;
/// ...and decays exponentially to here by the end of the tone.
pub const TONE_END_AMPLITUDE: f32 = 0.01;
pub const TONE_DURATION: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    #[default]
    Sine,
}

/// A request for one short synthesized tone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneSpec {
    pub frequency_hz: f32,
    pub waveform: Waveform,
    pub duration: Duration,
    pub start_amplitude: f32,
    pub end_amplitude: f32,
}

/// The click for a given beat: 1000 Hz on the downbeat, 800 Hz otherwise.
pub fn tone_for_beat(beat: u8) -> ToneSpec {
    let frequency_hz = if is_accent(beat) { ACCENT_FREQ_HZ } else { BEAT_FREQ_HZ };
    ToneSpec {
        frequency_hz,
        waveform: Waveform::Sine,
        duration: TONE_DURATION,
        start_amplitude: TONE_START_AMPLITUDE,
        end_amplitude: TONE_END_AMPLITUDE,
    }
}
