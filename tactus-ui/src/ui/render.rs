use ratatui::buffer::Buffer;
use ratatui::widgets::{Block, Borders, Widget};

pub use ratatui::layout::Rect;

use super::style::Style;

/// Thin drawing layer over a ratatui `Buffer` that takes our `Style` type.
/// Everything is clipped to the buffer.
pub struct RenderBuf<'a> {
    buf: &'a mut Buffer,
}

impl<'a> RenderBuf<'a> {
    pub fn new(buf: &'a mut Buffer) -> Self {
        Self { buf }
    }

    pub fn set_cell(&mut self, x: u16, y: u16, ch: char, style: Style) {
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(ch).set_style(ratatui::style::Style::from(style));
        }
    }

    /// Draw a string at (x, y) without wrapping.
    pub fn draw_str(&mut self, x: u16, y: u16, text: &str, style: Style) {
        for (i, ch) in text.chars().enumerate() {
            let Some(cx) = x.checked_add(i as u16) else {
                break;
            };
            self.set_cell(cx, y, ch, style);
        }
    }

    /// Draw `text` horizontally centered in `area` on row `y`.
    pub fn draw_centered(&mut self, area: Rect, y: u16, text: &str, style: Style) {
        let len = text.chars().count() as u16;
        let x = area.x + area.width.saturating_sub(len) / 2;
        self.draw_str(x, y, text, style);
    }

    pub fn fill(&mut self, area: Rect, ch: char, style: Style) {
        for y in area.y..area.y.saturating_add(area.height) {
            for x in area.x..area.x.saturating_add(area.width) {
                self.set_cell(x, y, ch, style);
            }
        }
    }

    /// Draw a bordered block with a title. Returns the inner `Rect`.
    pub fn draw_block(&mut self, area: Rect, title: &str, border_style: Style) -> Rect {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(ratatui::style::Style::from(border_style));
        let inner = block.inner(area);
        block.render(area, self.buf);
        inner
    }
}
