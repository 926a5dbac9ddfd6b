use tactus_types::{MetronomeAction, MetronomeView, StatusLevel, TempoRange, BEATS_PER_BAR};

use crate::ui::layout_helpers::{center_rect, hit, row};
use crate::ui::{
    Color, InputEvent, KeyCode, MouseButton, MouseEvent, MouseEventKind, Rect, RenderBuf,
    StatusMessage, Style,
};

const PANE_WIDTH: u16 = 48;
const PANE_HEIGHT: u16 = 18;
const MAX_ENTRY_DIGITS: usize = 3;

/// 3x5 digit glyphs, drawn two cells wide per pixel.
const GLYPHS: [[&str; 5]; 10] = [
    ["###", "# #", "# #", "# #", "###"],
    [" # ", "## ", " # ", " # ", "###"],
    ["###", "  #", "###", "#  ", "###"],
    ["###", "  #", "###", "  #", "###"],
    ["# #", "# #", "###", "  #", "  #"],
    ["###", "#  ", "###", "  #", "###"],
    ["###", "#  ", "###", "# #", "###"],
    ["###", "  #", "  #", "  #", "  #"],
    ["###", "# #", "###", "# #", "###"],
    ["###", "# #", "###", "  #", "###"],
];

/// Result of feeding a key to the tempo entry field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Key consumed, still editing
    Editing,
    Cancelled,
    Submitted(String),
}

/// The single metronome screen: beat display, indicator, slider, buttons.
///
/// Click targets are recorded during `render` so mouse events can be
/// resolved against what was last drawn.
#[derive(Debug, Default)]
pub struct MetronomePane {
    tempo_entry: Option<String>,
    play_button: Rect,
    mute_button: Rect,
    slider_track: Rect,
    range: TempoRange,
}

impl MetronomePane {
    pub fn new(range: TempoRange) -> Self {
        Self {
            range,
            ..Default::default()
        }
    }

    pub fn is_entering_tempo(&self) -> bool {
        self.tempo_entry.is_some()
    }

    pub fn begin_tempo_entry(&mut self) {
        self.tempo_entry = Some(String::new());
    }

    /// Digits append, Backspace deletes, Enter submits, Esc cancels.
    pub fn handle_entry_key(&mut self, event: &InputEvent) -> EntryOutcome {
        let Some(text) = self.tempo_entry.as_mut() else {
            return EntryOutcome::Cancelled;
        };
        match event.key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if text.len() < MAX_ENTRY_DIGITS {
                    text.push(c);
                }
                EntryOutcome::Editing
            }
            KeyCode::Backspace => {
                text.pop();
                EntryOutcome::Editing
            }
            KeyCode::Enter => {
                let submitted = std::mem::take(text);
                self.tempo_entry = None;
                EntryOutcome::Submitted(submitted)
            }
            KeyCode::Escape => {
                self.tempo_entry = None;
                EntryOutcome::Cancelled
            }
            _ => EntryOutcome::Editing,
        }
    }

    /// Map a mouse event over the last rendered frame to an action.
    pub fn handle_mouse(&self, event: &MouseEvent) -> Option<MetronomeAction> {
        let (col, r) = (event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if hit(self.play_button, col, r) {
                    Some(MetronomeAction::TogglePlay)
                } else if hit(self.mute_button, col, r) {
                    Some(MetronomeAction::ToggleSound)
                } else if hit(self.slider_track, col, r) {
                    Some(MetronomeAction::SetTempo(self.slider_bpm(col)))
                } else {
                    None
                }
            }
            MouseEventKind::Drag(MouseButton::Left) if hit(self.slider_track, col, r) => {
                Some(MetronomeAction::SetTempo(self.slider_bpm(col)))
            }
            MouseEventKind::ScrollUp => Some(MetronomeAction::AdjustTempo(1)),
            MouseEventKind::ScrollDown => Some(MetronomeAction::AdjustTempo(-1)),
            _ => None,
        }
    }

    fn slider_bpm(&self, column: u16) -> u16 {
        let width = self.slider_track.width.max(2) - 1;
        let offset = column.saturating_sub(self.slider_track.x).min(width);
        self.range.from_fraction(offset as f32 / width as f32)
    }

    pub fn render(
        &mut self,
        buf: &mut RenderBuf,
        area: Rect,
        view: &MetronomeView,
        status: Option<&StatusMessage>,
        hint: &str,
    ) {
        self.range = TempoRange::new(view.min_bpm, view.max_bpm);
        let outer = center_rect(area, PANE_WIDTH, PANE_HEIGHT);
        let inner = buf.draw_block(outer, " tactus ", Style::new().fg(Color::GRAY));

        self.render_beat(buf, inner, view);
        self.render_indicator(buf, row(inner, 7), view);
        self.render_tempo(buf, inner, view);
        self.render_buttons(buf, row(inner, 12), view);

        let status_row = row(inner, inner.height.saturating_sub(1));
        match status {
            Some(msg) => {
                let color = match msg.level {
                    StatusLevel::Info => Color::STATUS_INFO,
                    StatusLevel::Warning => Color::STATUS_WARNING,
                    StatusLevel::Error => Color::STATUS_ERROR,
                };
                buf.draw_centered(status_row, status_row.y, &clip(&msg.text, status_row.width), Style::new().fg(color));
            }
            None => {
                buf.draw_centered(status_row, status_row.y, &clip(hint, status_row.width), Style::new().fg(Color::DARK_GRAY));
            }
        }
    }

    fn render_beat(&self, buf: &mut RenderBuf, inner: Rect, view: &MetronomeView) {
        let color = match (view.beat_active, view.beat == 1) {
            (true, true) => Color::BEAT_ACCENT,
            (true, false) => Color::BEAT_ACTIVE,
            (false, _) => Color::BEAT_IDLE,
        };
        let style = Style::new().fg(color).bold();

        let digits: Vec<u32> = view.beat_text.chars().filter_map(|c| c.to_digit(10)).collect();
        let glyph_width = digits.len() as u16 * 8;
        let x0 = inner.x + inner.width.saturating_sub(glyph_width) / 2;
        for (i, digit) in digits.iter().enumerate() {
            let glyph = &GLYPHS[*digit as usize];
            let gx = x0 + i as u16 * 8;
            for (dy, line) in glyph.iter().enumerate() {
                for (dx, px) in line.chars().enumerate() {
                    if px == '#' {
                        let x = gx + dx as u16 * 2;
                        let y = inner.y + 1 + dy as u16;
                        buf.set_cell(x, y, '█', style);
                        buf.set_cell(x + 1, y, '█', style);
                    }
                }
            }
        }
    }

    fn render_indicator(&self, buf: &mut RenderBuf, line: Rect, view: &MetronomeView) {
        let dots: Vec<(char, Style)> = (1..=BEATS_PER_BAR)
            .map(|b| {
                if view.indicator_active && b == view.beat {
                    let color = if b == 1 { Color::BEAT_ACCENT } else { Color::BEAT_ACTIVE };
                    ('●', Style::new().fg(color))
                } else {
                    ('○', Style::new().fg(Color::BEAT_IDLE))
                }
            })
            .collect();
        let width = BEATS_PER_BAR as u16 * 2 - 1;
        let x0 = line.x + line.width.saturating_sub(width) / 2;
        for (i, (ch, style)) in dots.into_iter().enumerate() {
            buf.set_cell(x0 + i as u16 * 2, line.y, ch, style);
        }
    }

    fn render_tempo(&mut self, buf: &mut RenderBuf, inner: Rect, view: &MetronomeView) {
        let label_row = row(inner, 9);
        match &self.tempo_entry {
            Some(text) => {
                let label = format!("Tempo: {}_  (Enter/Esc)", text);
                buf.draw_centered(label_row, label_row.y, &label, Style::new().fg(Color::STATUS_WARNING));
            }
            None => {
                let label = format!("{} BPM", view.bpm_text);
                buf.draw_centered(label_row, label_row.y, &label, Style::new().fg(Color::WHITE).bold());
            }
        }

        let slider_row = row(inner, 10);
        let track_width = slider_row.width.saturating_sub(8);
        if track_width < 2 || slider_row.height == 0 {
            self.slider_track = Rect::default();
            return;
        }
        let track_x = slider_row.x + 4;
        self.slider_track = Rect::new(track_x, slider_row.y, track_width, 1);

        let range = TempoRange::new(view.min_bpm, view.max_bpm);
        let knob = (range.fraction(view.bpm) * (track_width - 1) as f32).round() as u16;
        let min_label = view.min_bpm.to_string();
        buf.draw_str(track_x.saturating_sub(min_label.len() as u16 + 1), slider_row.y, &min_label, Style::new().fg(Color::DARK_GRAY));
        for i in 0..track_width {
            let (ch, style) = if i == knob {
                ('◆', Style::new().fg(Color::WHITE).bold())
            } else if i < knob {
                ('━', Style::new().fg(Color::SLIDER_FILL))
            } else {
                ('─', Style::new().fg(Color::DARK_GRAY))
            };
            buf.set_cell(track_x + i, slider_row.y, ch, style);
        }
        buf.draw_str(track_x + track_width + 1, slider_row.y, &view.max_bpm.to_string(), Style::new().fg(Color::DARK_GRAY));
    }

    fn render_buttons(&mut self, buf: &mut RenderBuf, line: Rect, view: &MetronomeView) {
        let play = format!("[ {} ]", view.play_label);
        let mute = format!("[ {} ]", view.mute_label);
        let gap = 3u16;
        let total = play.chars().count() as u16 + gap + mute.chars().count() as u16;
        let x0 = line.x + line.width.saturating_sub(total) / 2;

        let play_color = if view.playing { Color::STOP_COLOR } else { Color::PLAY_COLOR };
        buf.draw_str(x0, line.y, &play, Style::new().fg(play_color).bold());
        self.play_button = Rect::new(x0, line.y, play.chars().count() as u16, line.height);

        let mx = x0 + play.chars().count() as u16 + gap;
        let mute_style = if view.muted {
            Style::new().fg(Color::MUTE_COLOR).reversed()
        } else {
            Style::new().fg(Color::MUTE_COLOR)
        };
        buf.draw_str(mx, line.y, &mute, mute_style);
        self.mute_button = Rect::new(mx, line.y, mute.chars().count() as u16, line.height);
    }
}

fn clip(text: &str, width: u16) -> String {
    text.chars().take(width as usize).collect()
}
