use ratatui::style::{Color as RatatuiColor, Modifier, Style as RatatuiStyle};

/// RGB color. Construct with `Color::new(r, g, b)` or use the named constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const GRAY: Color = Color::new(128, 128, 128);
    pub const DARK_GRAY: Color = Color::new(60, 60, 60);

    pub const BEAT_ACTIVE: Color = Color::new(255, 80, 80);     // Flash
    pub const BEAT_ACCENT: Color = Color::new(255, 200, 60);    // Downbeat flash
    pub const BEAT_IDLE: Color = Color::new(90, 90, 110);
    pub const SLIDER_FILL: Color = Color::new(100, 180, 255);
    pub const PLAY_COLOR: Color = Color::new(80, 220, 100);
    pub const STOP_COLOR: Color = Color::new(255, 100, 100);
    pub const MUTE_COLOR: Color = Color::new(200, 150, 255);

    pub const STATUS_INFO: Color = Color::new(135, 206, 235);
    pub const STATUS_WARNING: Color = Color::new(255, 220, 50);
    pub const STATUS_ERROR: Color = Color::new(255, 80, 80);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub reversed: bool,
}

impl Style {
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: false,
            reversed: false,
        }
    }

    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }
}

impl From<Color> for RatatuiColor {
    fn from(c: Color) -> Self {
        RatatuiColor::Rgb(c.r, c.g, c.b)
    }
}

impl From<Style> for RatatuiStyle {
    fn from(s: Style) -> Self {
        let mut rs = RatatuiStyle::default();
        if let Some(fg) = s.fg {
            rs = rs.fg(RatatuiColor::from(fg));
        }
        if let Some(bg) = s.bg {
            rs = rs.bg(RatatuiColor::from(bg));
        }
        if s.bold {
            rs = rs.add_modifier(Modifier::BOLD);
        }
        if s.reversed {
            rs = rs.add_modifier(Modifier::REVERSED);
        }
        rs
    }
}
