pub mod input;
pub mod keybindings;
pub mod layout_helpers;
pub mod ratatui_impl;
pub mod render;
pub mod status_bar;
pub mod style;

pub use input::{AppEvent, InputEvent, InputSource, KeyCode, Modifiers, MouseButton, MouseEvent, MouseEventKind};
pub use keybindings::{Keymap, UiAction};
pub use ratatui_impl::RatatuiBackend;
pub use render::{Rect, RenderBuf};
pub use status_bar::{StatusBar, StatusMessage};
pub use style::{Color, Style};
