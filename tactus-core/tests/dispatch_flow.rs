//! Front-end style interaction through the `Dispatcher` trait.

mod common;

use std::time::Instant;

use common::{settings, RecordingSynth};
use tactus_core::{LocalDispatcher, Metronome, TimerQueue};
use tactus_types::{Dispatcher, MetronomeAction, StatusLevel};

fn dispatcher(synth: RecordingSynth) -> (LocalDispatcher<TimerQueue, RecordingSynth>, Instant) {
    let t0 = Instant::now();
    let m = Metronome::new(settings(60), TimerQueue::new(t0), synth);
    (LocalDispatcher::new(m), t0)
}

#[test]
fn slider_drag_while_playing_restarts_at_new_interval() {
    let (mut d, t0) = dispatcher(RecordingSynth::default());
    d.dispatch(&MetronomeAction::TogglePlay);
    d.metronome_mut().advance(t0 + std::time::Duration::from_secs(1));
    assert_eq!(d.metronome().state().current_beat, 2);

    let result = d.dispatch(&MetronomeAction::SetTempo(120));
    assert!(result.changed);
    assert_eq!(d.metronome().state().current_beat, 1);
    assert_eq!(d.metronome().interval_ms(), 500.0);
    assert_eq!(d.metronome().view().bpm_text, "120");
}

#[test]
fn current_tempo_keeps_the_bar_running() {
    let (mut d, t0) = dispatcher(RecordingSynth::default());
    d.dispatch(&MetronomeAction::Start);
    d.metronome_mut().advance(t0 + std::time::Duration::from_secs(2));
    let timer = d.metronome().beat_timer();

    let result = d.dispatch(&MetronomeAction::SetTempo(60));
    assert!(!result.changed);
    assert!(result.status.is_empty());
    assert_eq!(d.metronome().state().current_beat, 3);
    assert_eq!(d.metronome().beat_timer(), timer);

    // Direct calls still restart
    d.metronome_mut().set_tempo(60);
    assert_eq!(d.metronome().state().current_beat, 1);
}

#[test]
fn rejected_tempo_does_not_disturb_playback() {
    let (mut d, _) = dispatcher(RecordingSynth::default());
    d.dispatch(&MetronomeAction::Start);
    let timer = d.metronome().beat_timer();
    let result = d.dispatch(&MetronomeAction::SetTempo(1000));
    assert_eq!(result.status[0].level, StatusLevel::Warning);
    assert_eq!(d.metronome().beat_timer(), timer);
    assert_eq!(d.metronome().state().bpm, 60);
}

#[test]
fn audio_failure_surfaces_once_as_status() {
    let (mut d, t0) = dispatcher(RecordingSynth { fail: true, ..Default::default() });
    let result = d.dispatch(&MetronomeAction::Start);
    assert!(result.changed);
    assert_eq!(result.status.len(), 1);
    assert_eq!(result.status[0].level, StatusLevel::Error);

    d.metronome_mut().advance(t0 + std::time::Duration::from_secs(1));
    let result = d.dispatch(&MetronomeAction::AdjustTempo(1));
    assert!(result.status.is_empty());
    assert_eq!(d.metronome().state().current_beat, 1);
    assert!(d.metronome().state().is_playing);
}

#[test]
fn mute_then_play_is_silent() {
    let (mut d, t0) = dispatcher(RecordingSynth::default());
    d.dispatch(&MetronomeAction::ToggleSound);
    d.dispatch(&MetronomeAction::Start);
    d.metronome_mut().advance(t0 + std::time::Duration::from_secs(3));
    assert_eq!(d.metronome().state().current_beat, 4);
    assert!(d.metronome().emitter().synth().tones.is_empty());
}
