//! Metronome state and the render snapshot handed to the presentation layer.

use serde::{Deserialize, Serialize};

use crate::DEFAULT_BPM;

/// Core metronome state. Owned by the scheduler; one per running metronome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetronomeState {
    /// Tempo in beats per minute
    pub bpm: u16,
    pub is_playing: bool,
    /// 0 before the first beat, then 1..=4
    pub current_beat: u8,
    pub sound_enabled: bool,
}

impl Default for MetronomeState {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            is_playing: false,
            current_beat: 0,
            sound_enabled: true,
        }
    }
}

/// Transient visual emphasis applied on each beat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashState {
    pub beat_active: bool,
    pub indicator_active: bool,
}

impl FlashState {
    pub fn is_active(&self) -> bool {
        self.beat_active || self.indicator_active
    }
}

/// A single beat, produced once per interval and consumed immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatEvent {
    pub beat: u8,
}

impl BeatEvent {
    pub fn is_accent(&self) -> bool {
        crate::is_accent(self.beat)
    }
}

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetronomeView {
    pub beat_text: String,
    /// 0 when stopped, otherwise the beat being shown
    pub beat: u8,
    pub beat_active: bool,
    pub indicator_active: bool,
    pub bpm: u16,
    pub bpm_text: String,
    pub min_bpm: u16,
    pub max_bpm: u16,
    pub playing: bool,
    pub play_label: &'static str,
    pub muted: bool,
    pub mute_label: &'static str,
}

pub const PLAY_LABEL: &str = "START";
pub const STOP_LABEL: &str = "STOP";
pub const SOUND_ON_LABEL: &str = "SOUND ON";
pub const SOUND_OFF_LABEL: &str = "MUTED";

impl MetronomeView {
    /// Build the view from state, flash flags and the tempo bounds.
    pub fn from_state(state: &MetronomeState, flash: FlashState, min_bpm: u16, max_bpm: u16) -> Self {
        // Idle display shows "1" so the counter reads as "ready for the downbeat"
        let shown = if state.current_beat == 0 { 1 } else { state.current_beat };
        Self {
            beat_text: shown.to_string(),
            beat: state.current_beat,
            beat_active: flash.beat_active,
            indicator_active: flash.indicator_active,
            bpm: state.bpm,
            bpm_text: state.bpm.to_string(),
            min_bpm,
            max_bpm,
            playing: state.is_playing,
            play_label: if state.is_playing { STOP_LABEL } else { PLAY_LABEL },
            muted: !state.sound_enabled,
            mute_label: if state.sound_enabled { SOUND_ON_LABEL } else { SOUND_OFF_LABEL },
        }
    }
}
