//! Audio output for the metronome click.
//!
//! [`CpalToneOutput`] implements `tactus_core::ToneSynth` on top of cpal.

pub mod output;
pub mod voice;

pub use output::{AudioError, CpalToneOutput, NO_AUDIO_ENV};
pub use voice::{ToneMixer, ToneVoice, MAX_VOICES};
