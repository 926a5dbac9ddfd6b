use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode as CrosstermKeyCode,
        KeyEvent, KeyEventKind, KeyModifiers, MouseButton as CrosstermMouseButton,
        MouseEvent as CrosstermMouseEvent, MouseEventKind as CrosstermMouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};

use super::render::RenderBuf;
use super::style::{Color, Style};
use super::{AppEvent, InputEvent, InputSource, KeyCode, Modifiers, MouseButton, MouseEvent, MouseEventKind};

/// Crossterm terminal: raw mode, alternate screen and mouse capture.
pub struct RatatuiBackend {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    active: bool,
}

impl RatatuiBackend {
    /// Does not touch terminal modes until [`start`](Self::start).
    pub fn new() -> io::Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self { terminal, active: false })
    }

    pub fn start(&mut self) -> io::Result<()> {
        let terminal = &mut self.terminal;
        begin_session(&mut self.active, enable_raw_mode, || {
            execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
            terminal.hide_cursor()?;
            terminal.clear()
        })
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn stop(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Draw one frame on a black background.
    pub fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut RenderBuf, Rect),
    {
        self.terminal.draw(|f| {
            let area = f.area();
            let mut buf = RenderBuf::new(f.buffer_mut());
            buf.fill(area, ' ', Style::new().bg(Color::BLACK));
            render(&mut buf, area);
        })?;
        Ok(())
    }
}

impl Drop for RatatuiBackend {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::error!(target: "ui", "failed to restore terminal: {}", e);
        }
    }
}

impl InputSource for RatatuiBackend {
    fn poll_event(&mut self, timeout: Duration) -> Option<AppEvent> {
        let mut t = timeout;
        loop {
            if !event::poll(t).ok()? {
                return None;
            }
            // Anything we discard is drained without waiting again
            t = Duration::ZERO;
            match event::read().ok()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    return Some(AppEvent::Key(convert_key_event(key)));
                }
                Event::Mouse(mouse) => {
                    if let Some(me) = convert_mouse_event(mouse) {
                        return Some(AppEvent::Mouse(me));
                    }
                }
                Event::Resize(w, h) => return Some(AppEvent::Resize(w, h)),
                _ => {}
            }
        }
    }
}

fn convert_modifiers(m: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: m.contains(KeyModifiers::CONTROL),
        alt: m.contains(KeyModifiers::ALT),
        shift: m.contains(KeyModifiers::SHIFT),
    }
}

/// Raw mode marks the session active before the rest of setup runs, so a
/// failure part way through still gets restored by `stop`.
fn begin_session(
    active: &mut bool,
    enable_raw: impl FnOnce() -> io::Result<()>,
    setup: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    enable_raw()?;
    *active = true;
    setup()
}

fn convert_key_event(event: KeyEvent) -> InputEvent {
    let key = match event.code {
        CrosstermKeyCode::Char(c) => KeyCode::Char(c),
        CrosstermKeyCode::Enter => KeyCode::Enter,
        CrosstermKeyCode::Esc => KeyCode::Escape,
        CrosstermKeyCode::Backspace => KeyCode::Backspace,
        CrosstermKeyCode::Up => KeyCode::Up,
        CrosstermKeyCode::Down => KeyCode::Down,
        CrosstermKeyCode::Left => KeyCode::Left,
        CrosstermKeyCode::Right => KeyCode::Right,
        _ => KeyCode::Other,
    };
    InputEvent::new(key, convert_modifiers(event.modifiers))
}

fn convert_mouse_button(button: CrosstermMouseButton) -> MouseButton {
    match button {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

fn convert_mouse_event(event: CrosstermMouseEvent) -> Option<MouseEvent> {
    let kind = match event.kind {
        CrosstermMouseEventKind::Down(btn) => MouseEventKind::Down(convert_mouse_button(btn)),
        CrosstermMouseEventKind::Up(btn) => MouseEventKind::Up(convert_mouse_button(btn)),
        CrosstermMouseEventKind::Drag(btn) => MouseEventKind::Drag(convert_mouse_button(btn)),
        CrosstermMouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
        CrosstermMouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
        _ => return None,
    };
    Some(MouseEvent::new(kind, event.column, event.row))
}
