use crate::ui::Rect;

/// Center a rect of `width x height` within `area`, shrinking it to leave a
/// one-cell margin when the area is too small.
pub fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width.saturating_sub(2));
    let h = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w, h)
}

/// Whether the cell (column, row) lies inside `rect`.
pub fn hit(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// One-row slice of `area` at offset `dy`, or an empty rect past the bottom.
pub fn row(area: Rect, dy: u16) -> Rect {
    if dy >= area.height {
        return Rect::new(area.x, area.y, 0, 0);
    }
    Rect::new(area.x, area.y + dy, area.width, 1)
}
