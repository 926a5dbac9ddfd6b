//! Beat pulse emitter.
//!
//! Turns each beat into a visual flash and, when sound is on, a click tone.

use std::time::Duration;

use tactus_types::{next_beat, tone_for_beat, BeatEvent, FlashState, MetronomeState};

use crate::synth::ToneSynth;
use crate::timer::{TimerHandle, TimerPurpose, TimerService};

pub struct PulseEmitter<S: ToneSynth> {
    synth: S,
    flash: FlashState,
    flash_duration: Duration,
    /// Outstanding flash-clear timers. Never cancelled; they drain as they fire.
    flash_timers: Vec<TimerHandle>,
    /// Set while synthesis is failing; cleared on the next success
    audio_error: Option<String>,
    /// New failure not yet picked up by the front end
    unreported_error: Option<String>,
    tones_played: u64,
}

impl<S: ToneSynth> PulseEmitter<S> {
    pub fn new(synth: S, flash_duration: Duration) -> Self {
        Self {
            synth,
            flash: FlashState::default(),
            flash_duration,
            flash_timers: Vec::new(),
            audio_error: None,
            unreported_error: None,
            tones_played: 0,
        }
    }

    /// Handle one beat: advance the counter, flash, schedule the clear, click.
    pub fn on_beat(&mut self, state: &mut MetronomeState, timers: &mut impl TimerService) -> BeatEvent {
        state.current_beat = next_beat(state.current_beat);
        let event = BeatEvent { beat: state.current_beat };

        self.flash.beat_active = true;
        self.flash.indicator_active = true;
        let handle = timers.arm_once(TimerPurpose::ClearFlash, self.flash_duration);
        self.flash_timers.push(handle);

        log::debug!(target: "emitter", "beat {}", event.beat);

        if state.sound_enabled {
            self.play_tone(event.beat);
        }
        event
    }

    /// Synthesize the click for `beat`. Failures are logged once per streak
    /// and never interrupt the beat cycle.
    pub fn play_tone(&mut self, beat: u8) {
        let tone = tone_for_beat(beat);
        match self.synth.play(&tone) {
            Ok(()) => {
                self.tones_played += 1;
                self.audio_error = None;
            }
            Err(e) => {
                if self.audio_error.is_none() {
                    log::warn!(target: "emitter", "click tone failed: {}", e);
                    self.unreported_error = Some(e.clone());
                }
                self.audio_error = Some(e);
            }
        }
    }

    /// Flip sound on/off. Re-enabling gives a failed audio output another try.
    pub fn toggle_sound(&mut self, state: &mut MetronomeState) -> bool {
        state.sound_enabled = !state.sound_enabled;
        if state.sound_enabled {
            self.synth.reset_failure();
            self.audio_error = None;
        }
        log::info!(target: "emitter", "sound {}", if state.sound_enabled { "on" } else { "off" });
        state.sound_enabled
    }

    /// A flash-clear timer fired. Only the clear armed by the latest beat
    /// ends the flash; older ones just drain.
    pub fn clear_flash(&mut self, handle: TimerHandle) {
        let newest = self.flash_timers.last() == Some(&handle);
        self.flash_timers.retain(|h| *h != handle);
        if newest {
            self.flash = FlashState::default();
        }
    }

    /// Back to the idle display: nothing highlighted.
    pub fn reset_idle(&mut self) {
        self.flash = FlashState::default();
    }

    pub fn flash(&self) -> FlashState {
        self.flash
    }

    pub fn pending_flash_clears(&self) -> usize {
        self.flash_timers.len()
    }

    pub fn tones_played(&self) -> u64 {
        self.tones_played
    }

    /// Current synthesis failure, if the last attempt failed.
    pub fn audio_error(&self) -> Option<&str> {
        self.audio_error.as_deref()
    }

    /// Take a failure that has not been shown to the user yet.
    pub fn take_unreported_error(&mut self) -> Option<String> {
        self.unreported_error.take()
    }

    pub fn synth(&self) -> &S {
        &self.synth
    }

}
