//! Action dispatch: the single entry point the front end uses to mutate the
//! metronome.
//!
//! Tempo input is validated here, at the boundary. Out-of-range values are
//! rejected and the last valid tempo is kept.

use tactus_types::{DispatchResult, Dispatcher, MetronomeAction, StatusEvent};

use crate::scheduler::Metronome;
use crate::synth::ToneSynth;
use crate::timer::TimerService;

pub fn dispatch_action<T: TimerService, S: ToneSynth>(
    action: &MetronomeAction,
    metronome: &mut Metronome<T, S>,
) -> DispatchResult {
    let mut result = match action {
        MetronomeAction::SetTempo(bpm) => match metronome.range().validate(*bpm) {
            Ok(bpm) => retempo(metronome, bpm),
            Err(e) => {
                log::warn!(target: "dispatch", "rejected tempo: {}", e);
                DispatchResult::none().with_status(StatusEvent::warning(e))
            }
        },
        MetronomeAction::AdjustTempo(delta) => {
            let bpm = metronome.range().step(metronome.state().bpm, *delta);
            retempo(metronome, bpm)
        }
        MetronomeAction::TogglePlay => {
            metronome.toggle();
            DispatchResult::changed()
        }
        MetronomeAction::Start => {
            if metronome.start().is_some() {
                DispatchResult::changed()
            } else {
                DispatchResult::none()
            }
        }
        MetronomeAction::Stop => {
            let was_playing = metronome.state().is_playing;
            metronome.stop();
            DispatchResult { changed: was_playing, status: Vec::new() }
        }
        MetronomeAction::ToggleSound => {
            let on = metronome.toggle_sound();
            DispatchResult::changed()
                .with_status(StatusEvent::info(if on { "Sound on" } else { "Sound muted" }))
        }
    };

    if let Some(e) = metronome.emitter_mut().take_unreported_error() {
        result.status.push(StatusEvent::error(format!("Audio unavailable: {}", e)));
    }
    result
}

fn retempo<T: TimerService, S: ToneSynth>(metronome: &mut Metronome<T, S>, bpm: u16) -> DispatchResult {
    // Same tempo while playing would still restart the bar; skip it
    if bpm == metronome.state().bpm {
        return DispatchResult::none();
    }
    metronome.set_tempo(bpm);
    DispatchResult::changed()
}

/// Dispatcher that owns the metronome and executes actions in-process.
pub struct LocalDispatcher<T: TimerService, S: ToneSynth> {
    metronome: Metronome<T, S>,
}

impl<T: TimerService, S: ToneSynth> LocalDispatcher<T, S> {
    pub fn new(metronome: Metronome<T, S>) -> Self {
        Self { metronome }
    }

    pub fn metronome(&self) -> &Metronome<T, S> {
        &self.metronome
    }

    pub fn metronome_mut(&mut self) -> &mut Metronome<T, S> {
        &mut self.metronome
    }
}

impl<T: TimerService, S: ToneSynth> Dispatcher for LocalDispatcher<T, S> {
    fn dispatch(&mut self, action: &MetronomeAction) -> DispatchResult {
        dispatch_action(action, &mut self.metronome)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::scheduler::MetronomeSettings;
    use crate::synth::SilentSynth;
    use crate::timer::TimerQueue;
    use tactus_types::{StatusLevel, TempoRange};

    fn dispatcher(bpm: u16) -> LocalDispatcher<TimerQueue, SilentSynth> {
        let settings = MetronomeSettings {
            bpm,
            range: TempoRange::new(40, 240),
            ..Default::default()
        };
        LocalDispatcher::new(Metronome::new(settings, TimerQueue::new(Instant::now()), SilentSynth))
    }

    #[test]
    fn out_of_range_tempo_keeps_last_valid() {
        let mut d = dispatcher(120);
        let result = d.dispatch(&MetronomeAction::SetTempo(500));
        assert!(!result.changed);
        assert_eq!(result.status.len(), 1);
        assert_eq!(result.status[0].level, StatusLevel::Warning);
        assert_eq!(d.metronome().state().bpm, 120);

        d.dispatch(&MetronomeAction::SetTempo(0));
        assert_eq!(d.metronome().state().bpm, 120);
    }

    #[test]
    fn set_tempo_in_range() {
        let mut d = dispatcher(120);
        let result = d.dispatch(&MetronomeAction::SetTempo(90));
        assert!(result.changed);
        assert!(result.status.is_empty());
        assert_eq!(d.metronome().state().bpm, 90);
    }

    #[test]
    fn adjust_tempo_stops_at_bounds() {
        let mut d = dispatcher(235);
        d.dispatch(&MetronomeAction::AdjustTempo(10));
        assert_eq!(d.metronome().state().bpm, 240);
        let result = d.dispatch(&MetronomeAction::AdjustTempo(1));
        assert!(!result.changed);
        d.dispatch(&MetronomeAction::AdjustTempo(-500));
        assert_eq!(d.metronome().state().bpm, 40);
    }

    #[test]
    fn redundant_transitions_are_noops() {
        let mut d = dispatcher(120);
        assert!(!d.dispatch(&MetronomeAction::Stop).changed);
        assert!(d.dispatch(&MetronomeAction::Start).changed);
        assert!(!d.dispatch(&MetronomeAction::Start).changed);
        assert_eq!(d.metronome().state().current_beat, 1);
        assert!(d.dispatch(&MetronomeAction::Stop).changed);
        assert!(!d.dispatch(&MetronomeAction::Stop).changed);
    }

    #[test]
    fn toggle_sound_reports_status() {
        let mut d = dispatcher(120);
        let result = d.dispatch(&MetronomeAction::ToggleSound);
        assert!(result.changed);
        assert_eq!(result.status[0].message, "Sound muted");
        assert!(d.metronome().view().muted);
        let result = d.dispatch(&MetronomeAction::ToggleSound);
        assert_eq!(result.status[0].message, "Sound on");
    }

    #[test]
    fn toggle_play_round_trip() {
        let mut d = dispatcher(120);
        d.dispatch(&MetronomeAction::TogglePlay);
        assert!(d.metronome().state().is_playing);
        assert_eq!(d.metronome().view().play_label, "STOP");
        d.dispatch(&MetronomeAction::TogglePlay);
        assert!(!d.metronome().state().is_playing);
        assert_eq!(d.metronome().view().play_label, "START");
    }
}
