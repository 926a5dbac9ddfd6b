//! Beat scheduler: tempo, play state and the repeating beat timer.
//!
//! States are Stopped and Playing. `start` fires beat 1 synchronously and
//! then arms one repeating timer at `60000 / bpm` ms. `stop` cancels it.
//! Retempo while playing is a full stop + start, so the bar restarts at 1.

use std::time::{Duration, Instant};

use tactus_types::{beat_interval, BeatEvent, FlashState, MetronomeState, MetronomeView, TempoRange};

use crate::emitter::PulseEmitter;
use crate::synth::ToneSynth;
use crate::timer::{TimerFired, TimerHandle, TimerPurpose, TimerQueue, TimerService};

/// Startup parameters for a [`Metronome`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetronomeSettings {
    pub bpm: u16,
    pub range: TempoRange,
    pub sound_enabled: bool,
    pub flash_duration: Duration,
}

impl Default for MetronomeSettings {
    fn default() -> Self {
        Self {
            bpm: tactus_types::DEFAULT_BPM,
            range: TempoRange::default(),
            sound_enabled: true,
            flash_duration: tactus_types::FLASH_DURATION,
        }
    }
}

/// One running metronome: scheduler state plus its pulse emitter.
pub struct Metronome<T: TimerService, S: ToneSynth> {
    state: MetronomeState,
    range: TempoRange,
    timers: T,
    /// Present iff playing
    beat_timer: Option<TimerHandle>,
    emitter: PulseEmitter<S>,
}

impl<T: TimerService, S: ToneSynth> Metronome<T, S> {
    pub fn new(settings: MetronomeSettings, timers: T, synth: S) -> Self {
        let range = settings.range;
        let state = MetronomeState {
            bpm: range.clamp(settings.bpm),
            is_playing: false,
            current_beat: 0,
            sound_enabled: settings.sound_enabled,
        };
        Self {
            state,
            range,
            timers,
            beat_timer: None,
            emitter: PulseEmitter::new(synth, settings.flash_duration),
        }
    }

    /// Start playing. No-op if already playing.
    pub fn start(&mut self) -> Option<BeatEvent> {
        if self.state.is_playing {
            return None;
        }
        self.state.is_playing = true;
        self.state.current_beat = 0;

        let first = self.emitter.on_beat(&mut self.state, &mut self.timers);

        let interval = self.interval();
        self.beat_timer = Some(self.timers.arm_repeating(TimerPurpose::Beat, interval));
        log::info!(target: "scheduler", "start at {} BPM ({:.2} ms)", self.state.bpm, self.interval_ms());
        Some(first)
    }

    /// Stop playing and return to the idle display. Safe to call repeatedly.
    pub fn stop(&mut self) {
        let was_playing = self.state.is_playing;
        self.state.is_playing = false;
        self.state.current_beat = 0;
        if let Some(handle) = self.beat_timer.take() {
            self.timers.cancel(handle);
        }
        self.emitter.reset_idle();
        if was_playing {
            log::info!(target: "scheduler", "stop");
        }
    }

    pub fn toggle(&mut self) {
        if self.state.is_playing {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Change tempo. While playing this restarts the timer at the new
    /// interval and fires beat 1 immediately.
    ///
    /// `bpm` is expected to be validated by the caller; zero is bumped to 1.
    pub fn set_tempo(&mut self, bpm: u16) {
        self.state.bpm = bpm.max(1);
        log::info!(target: "scheduler", "tempo {} BPM", self.state.bpm);
        if self.state.is_playing {
            self.stop();
            self.start();
        }
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.emitter.toggle_sound(&mut self.state)
    }

    /// Deliver a fired timer. Beats from a cancelled timer are dropped.
    pub fn fire(&mut self, fired: TimerFired) -> Option<BeatEvent> {
        match fired.purpose {
            TimerPurpose::Beat => {
                if self.beat_timer == Some(fired.handle) {
                    Some(self.emitter.on_beat(&mut self.state, &mut self.timers))
                } else {
                    log::debug!(target: "scheduler", "dropping stale beat from timer {}", fired.handle.id());
                    None
                }
            }
            TimerPurpose::ClearFlash => {
                self.emitter.clear_flash(fired.handle);
                None
            }
        }
    }

    /// Current beat interval.
    pub fn interval(&self) -> Duration {
        beat_interval(self.state.bpm)
    }

    pub fn interval_ms(&self) -> f64 {
        tactus_types::beat_interval_ms(self.state.bpm)
    }

    pub fn state(&self) -> &MetronomeState {
        &self.state
    }

    pub fn range(&self) -> TempoRange {
        self.range
    }

    pub fn flash(&self) -> FlashState {
        self.emitter.flash()
    }

    pub fn beat_timer(&self) -> Option<TimerHandle> {
        self.beat_timer
    }

    pub fn emitter(&self) -> &PulseEmitter<S> {
        &self.emitter
    }

    pub fn emitter_mut(&mut self) -> &mut PulseEmitter<S> {
        &mut self.emitter
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    /// Snapshot for the presentation layer.
    pub fn view(&self) -> MetronomeView {
        MetronomeView::from_state(&self.state, self.emitter.flash(), self.range.min(), self.range.max())
    }
}

impl<S: ToneSynth> Metronome<TimerQueue, S> {
    /// Fire every timer due at `now`, in deadline order. Returns how many fired.
    pub fn advance(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some(timer) = self.timers.pop_due(now) {
            self.fire(timer);
            fired += 1;
        }
        fired
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }
}
