//! # tactus-types
//!
//! Shared type definitions for the Tactus metronome.
//! Plain data used by tactus-core (scheduling), tactus-audio (tone output)
//! and tactus-ui (terminal front end).

pub mod action;
mod dispatch;
pub mod state;
pub mod tempo;
pub mod tone;

pub use action::*;
pub use dispatch::Dispatcher;
pub use state::*;
pub use tempo::{beat_interval, beat_interval_ms, parse_bpm, TempoRange};
pub use tone::{tone_for_beat, ToneSpec, Waveform};

use std::time::Duration;

/// Beats in one measure. Beat 1 is the accented downbeat.
pub const BEATS_PER_BAR: u8 = 4;

/// Tempo used when nothing else is configured.
pub const DEFAULT_BPM: u16 = 180;

/// How long the beat number and indicator stay highlighted after a beat.
pub const FLASH_DURATION: Duration = Duration::from_millis(100);

/// Advance a beat counter: 0 (not started) → 1, then 1→2→3→4→1.
pub fn next_beat(current: u8) -> u8 {
    (current % BEATS_PER_BAR) + 1
}

/// Whether a beat number is the accented downbeat.
pub fn is_accent(beat: u8) -> bool {
    beat == 1
}
