//! Rendering: redraw on change, throttled to the configured frame interval.

use std::time::Instant;

use super::AppRuntime;
use crate::ui::{RatatuiBackend, Rect, RenderBuf};
use tactus_core::ToneSynth;

impl<S: ToneSynth> AppRuntime<S> {
    pub(crate) fn maybe_render(&mut self, backend: &mut RatatuiBackend) -> std::io::Result<()> {
        let now = Instant::now();
        if let Some(last) = self.last_render_time {
            if now.duration_since(last) < self.frame_interval {
                return Ok(());
            }
        }

        // Keep redrawing while a status message is up so it disappears on time
        if self.status_bar.current().is_some() {
            self.render_needed = true;
        }
        if !self.render_needed {
            return Ok(());
        }

        backend.draw(|buf, area| self.render_into(buf, area))?;
        self.last_render_time = Some(now);
        self.render_needed = false;
        Ok(())
    }

    pub(crate) fn render_into(&mut self, buf: &mut RenderBuf, area: Rect) {
        let view = self.metronome().view();
        let status = self.status_bar.current();
        self.pane.render(buf, area, &view, status, &self.hint);
        self.last_view = Some(view);
    }
}
