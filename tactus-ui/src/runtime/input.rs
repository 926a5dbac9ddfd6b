//! Input processing: event polling, key map resolution, tempo entry, dispatch.

use std::time::{Duration, Instant};

use tactus_types::{parse_bpm, Dispatcher, MetronomeAction, StatusLevel};

use super::AppRuntime;
use crate::panes::EntryOutcome;
use crate::ui::{AppEvent, InputEvent, InputSource, UiAction};
use tactus_core::ToneSynth;

/// Events handled per loop iteration before timers get a chance to run.
const MAX_EVENTS_PER_FRAME: u8 = 16;

impl<S: ToneSynth> AppRuntime<S> {
    /// Process pending input. Returns true if the app should quit.
    pub(crate) fn process_events(&mut self, input: &mut impl InputSource) -> bool {
        let mut timeout = self.poll_timeout(Instant::now());
        for _ in 0..MAX_EVENTS_PER_FRAME {
            let Some(event) = input.poll_event(timeout) else {
                break;
            };
            timeout = Duration::ZERO;
            if self.handle_event(event) {
                return true;
            }
        }
        false
    }

    fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Resize(_, _) => {
                self.render_needed = true;
                false
            }
            AppEvent::Mouse(mouse) => {
                if let Some(action) = self.pane.handle_mouse(&mouse) {
                    self.dispatch(action);
                }
                false
            }
            AppEvent::Key(key) => self.handle_key(&key),
        }
    }

    fn handle_key(&mut self, event: &InputEvent) -> bool {
        if event.is_interrupt() {
            return true;
        }

        if self.pane.is_entering_tempo() {
            self.render_needed = true;
            match self.pane.handle_entry_key(event) {
                EntryOutcome::Submitted(text) if !text.is_empty() => {
                    match parse_bpm(&text, &self.metronome().range()) {
                        Ok(bpm) => self.dispatch(MetronomeAction::SetTempo(bpm)),
                        Err(e) => {
                            log::warn!(target: "ui", "rejected typed tempo: {}", e);
                            self.status_bar.push(e, StatusLevel::Warning);
                        }
                    }
                }
                EntryOutcome::Submitted(_) | EntryOutcome::Cancelled | EntryOutcome::Editing => {}
            }
            return false;
        }

        let Some(action) = self.keymap.lookup(event) else {
            return false;
        };
        let action = match action {
            UiAction::Quit => return true,
            UiAction::EnterTempo => {
                self.pane.begin_tempo_entry();
                self.render_needed = true;
                return false;
            }
            UiAction::TogglePlay => MetronomeAction::TogglePlay,
            UiAction::ToggleSound => MetronomeAction::ToggleSound,
            UiAction::TempoUp => MetronomeAction::AdjustTempo(self.step),
            UiAction::TempoDown => MetronomeAction::AdjustTempo(-self.step),
            UiAction::TempoUpCoarse => MetronomeAction::AdjustTempo(self.coarse_step),
            UiAction::TempoDownCoarse => MetronomeAction::AdjustTempo(-self.coarse_step),
        };
        self.dispatch(action);
        false
    }

    pub(crate) fn dispatch(&mut self, action: MetronomeAction) {
        log::debug!(target: "ui", "dispatch {:?}", action);
        // Bring the timer clock up to date so new timers are armed from now
        self.tick(Instant::now());
        let result = self.dispatcher.dispatch(&action);
        if result.changed || !result.status.is_empty() {
            self.render_needed = true;
        }
        self.status_bar.apply(&result.status);
    }
}
