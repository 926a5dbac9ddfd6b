//! App runtime: owns the metronome and drives the event loop.
//!
//! - `input`: event polling, key map resolution, tempo entry, dispatch
//! - `render`: redraw when the view changed, throttled to the frame interval
//!
//! The loop sleeps in `poll_event` for at most one frame, or less when a
//! timer is due sooner, then fires due timers before drawing.

mod input;
mod render;

use std::time::{Duration, Instant};

use tactus_core::{Config, LocalDispatcher, Metronome, TimerQueue, ToneSynth};
use tactus_types::{MetronomeView, StatusLevel};

use crate::panes::MetronomePane;
use crate::ui::{Keymap, RatatuiBackend, StatusBar};

/// Command-line overrides applied on top of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupOptions {
    pub bpm: Option<u16>,
    pub mute: bool,
}

pub struct AppRuntime<S: ToneSynth> {
    pub(crate) dispatcher: LocalDispatcher<TimerQueue, S>,
    pub(crate) pane: MetronomePane,
    pub(crate) keymap: Keymap,
    pub(crate) status_bar: StatusBar,
    pub(crate) hint: String,
    pub(crate) step: i32,
    pub(crate) coarse_step: i32,
    pub(crate) frame_interval: Duration,

    // Per-frame state
    pub(crate) render_needed: bool,
    pub(crate) last_render_time: Option<Instant>,
    pub(crate) last_view: Option<MetronomeView>,
}

impl<S: ToneSynth> AppRuntime<S> {
    pub fn new(config: &Config, options: &StartupOptions, synth: S, keymap: Keymap) -> Self {
        let mut settings = config.settings();
        let mut status_bar = StatusBar::new();

        if let Some(bpm) = options.bpm {
            if !settings.range.contains(bpm) {
                let clamped = settings.range.clamp(bpm);
                log::warn!(target: "ui", "--bpm {} outside {}-{}, using {}", bpm, settings.range.min(), settings.range.max(), clamped);
                status_bar.push(format!("--bpm {} out of range, using {}", bpm, clamped), StatusLevel::Warning);
            }
            settings.bpm = settings.range.clamp(bpm);
        }
        if options.mute {
            settings.sound_enabled = false;
        }

        let pane = MetronomePane::new(settings.range);
        let metronome = Metronome::new(settings, TimerQueue::new(Instant::now()), synth);
        let hint = keymap.hint();

        Self {
            dispatcher: LocalDispatcher::new(metronome),
            pane,
            keymap,
            status_bar,
            hint,
            step: config.step() as i32,
            coarse_step: config.coarse_step() as i32,
            frame_interval: config.frame_interval(),
            render_needed: true,
            last_render_time: None,
            last_view: None,
        }
    }

    pub fn metronome(&self) -> &Metronome<TimerQueue, S> {
        self.dispatcher.metronome()
    }

    /// How long input polling may block: one frame, or until the next timer.
    pub(crate) fn poll_timeout(&self, now: Instant) -> Duration {
        match self.metronome().next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(self.frame_interval),
            None => self.frame_interval,
        }
    }

    /// Fire every timer due at `now` and note whether the view changed.
    pub(crate) fn tick(&mut self, now: Instant) -> usize {
        let metronome = self.dispatcher.metronome_mut();
        let fired = metronome.advance(now);
        if let Some(e) = metronome.emitter_mut().take_unreported_error() {
            self.status_bar.push(format!("Audio unavailable: {}", e), StatusLevel::Error);
            self.render_needed = true;
        }

        let view = self.metronome().view();
        if self.last_view.as_ref() != Some(&view) {
            self.render_needed = true;
        }
        fired
    }

    /// Main event loop.
    pub fn run(&mut self, backend: &mut RatatuiBackend) -> std::io::Result<()> {
        log::info!(target: "ui", "event loop started");
        loop {
            if self.process_events(backend) {
                break;
            }
            self.tick(Instant::now());
            self.maybe_render(backend)?;
        }
        self.dispatcher.metronome_mut().stop();
        log::info!(target: "ui", "event loop finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use tactus_core::SilentSynth;

    use super::*;
    use crate::ui::keybindings::load_keybindings_from;
    use crate::ui::{AppEvent, InputEvent, InputSource, KeyCode, MouseButton, MouseEvent, MouseEventKind, Rect};

    struct Scripted(VecDeque<AppEvent>);

    impl InputSource for Scripted {
        fn poll_event(&mut self, _timeout: Duration) -> Option<AppEvent> {
            self.0.pop_front()
        }
    }

    fn runtime(options: StartupOptions) -> AppRuntime<SilentSynth> {
        let config = Config::load_from(None);
        AppRuntime::new(&config, &options, SilentSynth, load_keybindings_from(None))
    }

    fn keys(keys: &[KeyCode]) -> Scripted {
        Scripted(keys.iter().map(|k| AppEvent::Key(InputEvent::key(*k))).collect())
    }

    #[test]
    fn startup_options_override_config() {
        let rt = runtime(StartupOptions { bpm: Some(90), mute: true });
        assert_eq!(rt.metronome().state().bpm, 90);
        assert!(!rt.metronome().state().sound_enabled);
        assert!(rt.status_bar.current().is_none());

        let rt = runtime(StartupOptions { bpm: Some(999), mute: false });
        assert_eq!(rt.metronome().state().bpm, 240);
        assert_eq!(rt.status_bar.current().unwrap().level, StatusLevel::Warning);
    }

    #[test]
    fn space_starts_and_quit_stops_loop() {
        let mut rt = runtime(StartupOptions::default());
        let mut input = keys(&[KeyCode::Char(' ')]);
        assert!(!rt.process_events(&mut input));
        assert!(rt.metronome().state().is_playing);
        assert_eq!(rt.metronome().state().current_beat, 1);

        let mut input = keys(&[KeyCode::Char('q')]);
        assert!(rt.process_events(&mut input));
    }

    #[test]
    fn arrow_keys_step_tempo() {
        let mut rt = runtime(StartupOptions { bpm: Some(100), mute: false });
        rt.process_events(&mut keys(&[KeyCode::Right, KeyCode::Right, KeyCode::Up]));
        assert_eq!(rt.metronome().state().bpm, 112);
        rt.process_events(&mut keys(&[KeyCode::Down, KeyCode::Left]));
        assert_eq!(rt.metronome().state().bpm, 101);
    }

    #[test]
    fn typed_tempo_is_validated() {
        let mut rt = runtime(StartupOptions { bpm: Some(100), mute: false });
        rt.process_events(&mut keys(&[KeyCode::Char('t'), KeyCode::Char('9'), KeyCode::Char('0'), KeyCode::Enter]));
        assert_eq!(rt.metronome().state().bpm, 90);
        // Enter inside entry mode must not also toggle play
        assert!(!rt.metronome().state().is_playing);

        rt.process_events(&mut keys(&[KeyCode::Char('t'), KeyCode::Char('9'), KeyCode::Char('9'), KeyCode::Char('9'), KeyCode::Enter]));
        assert_eq!(rt.metronome().state().bpm, 90);
        assert_eq!(rt.status_bar.current().unwrap().level, StatusLevel::Warning);

        rt.process_events(&mut keys(&[KeyCode::Char('t'), KeyCode::Enter]));
        assert_eq!(rt.metronome().state().bpm, 90);
    }

    #[test]
    fn tick_fires_due_beats() {
        let mut rt = runtime(StartupOptions { bpm: Some(60), mute: true });
        let t0 = Instant::now();
        rt.process_events(&mut keys(&[KeyCode::Enter]));
        assert_eq!(rt.metronome().state().current_beat, 1);
        rt.tick(t0 + Duration::from_millis(1050));
        assert_eq!(rt.metronome().state().current_beat, 2);
        rt.tick(t0 + Duration::from_millis(3050));
        assert_eq!(rt.metronome().state().current_beat, 4);
    }

    #[test]
    fn poll_timeout_never_exceeds_frame() {
        let mut rt = runtime(StartupOptions::default());
        let now = Instant::now();
        assert_eq!(rt.poll_timeout(now), rt.frame_interval);
        rt.process_events(&mut keys(&[KeyCode::Char(' ')]));
        assert!(rt.poll_timeout(now) <= rt.frame_interval);
        // Past every deadline the poll must not block
        assert_eq!(rt.poll_timeout(now + Duration::from_secs(5)), Duration::ZERO);
    }

    #[test]
    fn mouse_click_on_play_button() {
        let mut rt = runtime(StartupOptions::default());
        let area = Rect::new(0, 0, 60, 22);
        let mut buffer = ratatui::buffer::Buffer::empty(area);
        rt.render_into(&mut crate::ui::RenderBuf::new(&mut buffer), area);

        let (x, y) = find(&buffer, "[ START ]");
        let click = MouseEvent::new(MouseEventKind::Down(MouseButton::Left), x + 2, y);
        rt.process_events(&mut Scripted(VecDeque::from([AppEvent::Mouse(click)])));
        assert!(rt.metronome().state().is_playing);
    }

    fn find(buffer: &ratatui::buffer::Buffer, needle: &str) -> (u16, u16) {
        let area = buffer.area;
        for y in 0..area.height {
            let line: String = (0..area.width).map(|x| buffer[(x, y)].symbol().to_string()).collect();
            if let Some(col) = line.find(needle) {
                return (line[..col].chars().count() as u16, y);
            }
        }
        panic!("{:?} not rendered", needle);
    }
}
