use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{InputEvent, KeyCode};

/// What a key press asks the UI to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    TogglePlay,
    ToggleSound,
    TempoUp,
    TempoDown,
    TempoUpCoarse,
    TempoDownCoarse,
    EnterTempo,
    Quit,
}

fn parse_action(s: &str) -> Option<UiAction> {
    match s {
        "toggle_play" => Some(UiAction::TogglePlay),
        "toggle_sound" => Some(UiAction::ToggleSound),
        "tempo_up" => Some(UiAction::TempoUp),
        "tempo_down" => Some(UiAction::TempoDown),
        "tempo_up_coarse" => Some(UiAction::TempoUpCoarse),
        "tempo_down_coarse" => Some(UiAction::TempoDownCoarse),
        "enter_tempo" => Some(UiAction::EnterTempo),
        "quit" => Some(UiAction::Quit),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPattern {
    Char(char),
    Ctrl(char),
    Key(KeyCode),
}

impl KeyPattern {
    fn matches(&self, event: &InputEvent) -> bool {
        let m = event.modifiers;
        match *self {
            KeyPattern::Char(c) => event.key == KeyCode::Char(c) && !m.ctrl && !m.alt,
            KeyPattern::Ctrl(c) => event.key == KeyCode::Char(c) && m.ctrl,
            KeyPattern::Key(code) => event.key == code && !m.ctrl && !m.alt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub pattern: KeyPattern,
    pub action: UiAction,
    pub description: String,
}

/// Ordered key bindings; the first match wins.
#[derive(Debug, Clone, Default)]
pub struct Keymap {
    bindings: Vec<KeyBinding>,
}

impl Keymap {
    pub fn from_bindings(bindings: Vec<KeyBinding>) -> Self {
        Self { bindings }
    }

    pub fn lookup(&self, event: &InputEvent) -> Option<UiAction> {
        self.bindings
            .iter()
            .find(|b| b.pattern.matches(event))
            .map(|b| b.action)
    }

    /// Short help line, e.g. "Space start / stop  m mute / unmute".
    pub fn hint(&self) -> String {
        let mut seen: Vec<UiAction> = Vec::new();
        let mut parts = Vec::new();
        for b in &self.bindings {
            if seen.contains(&b.action) {
                continue;
            }
            seen.push(b.action);
            parts.push(format!("{} {}", pattern_label(&b.pattern), b.description.to_lowercase()));
        }
        parts.join("  ")
    }
}

fn pattern_label(p: &KeyPattern) -> String {
    match p {
        KeyPattern::Char(' ') => "Space".to_string(),
        KeyPattern::Char(c) => c.to_string(),
        KeyPattern::Ctrl(c) => format!("^{}", c),
        KeyPattern::Key(KeyCode::Up) => "↑".to_string(),
        KeyPattern::Key(KeyCode::Down) => "↓".to_string(),
        KeyPattern::Key(KeyCode::Left) => "←".to_string(),
        KeyPattern::Key(KeyCode::Right) => "→".to_string(),
        KeyPattern::Key(code) => format!("{:?}", code),
    }
}

#[derive(Deserialize)]
struct KeybindingConfig {
    #[allow(dead_code)]
    version: u32,
    #[serde(default)]
    bindings: Vec<RawBinding>,
}

#[derive(Deserialize, Clone)]
struct RawBinding {
    key: String,
    action: String,
    #[serde(default)]
    description: String,
}

/// Parse key notation: `"q"`, `"Space"`, `"Up"`, `"Ctrl+c"`.
fn parse_key(s: &str) -> Option<KeyPattern> {
    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeyPattern::Ctrl(c)),
            _ => None,
        };
    }
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyPattern::Char(c));
    }
    let code = match s {
        "Space" => return Some(KeyPattern::Char(' ')),
        "Enter" => KeyCode::Enter,
        "Escape" | "Esc" => KeyCode::Escape,
        "Backspace" => KeyCode::Backspace,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        _ => return None,
    };
    Some(KeyPattern::Key(code))
}

const DEFAULT_KEYBINDINGS: &str = include_str!("../../keybindings.toml");

/// Embedded defaults merged with `~/.config/tactus/keybindings.toml`.
pub fn load_keybindings() -> Keymap {
    load_keybindings_from(user_keybindings_path().as_deref())
}

pub fn load_keybindings_from(user_path: Option<&Path>) -> Keymap {
    let mut bindings = match toml::from_str::<KeybindingConfig>(DEFAULT_KEYBINDINGS) {
        Ok(config) => config.bindings,
        Err(e) => {
            log::error!(target: "ui::keybindings", "embedded keybindings.toml is invalid: {}", e);
            Vec::new()
        }
    };

    if let Some(path) = user_path.filter(|p| p.exists()) {
        match std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|s| toml::from_str::<KeybindingConfig>(&s).map_err(|e| e.to_string()))
        {
            Ok(user) => merge_bindings(&mut bindings, user.bindings),
            Err(e) => {
                log::warn!(target: "ui::keybindings", "ignoring keybindings {}: {}", path.display(), e)
            }
        }
    }

    Keymap::from_bindings(build_bindings(&bindings))
}

fn user_keybindings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tactus").join("keybindings.toml"))
}

/// User entries replace every default binding for the same action.
fn merge_bindings(base: &mut Vec<RawBinding>, user: Vec<RawBinding>) {
    for action in user.iter().map(|b| b.action.as_str()) {
        base.retain(|b| b.action != action);
    }
    // User keys take priority when a key is bound twice
    let mut merged = user;
    merged.append(base);
    *base = merged;
}

fn build_bindings(raw: &[RawBinding]) -> Vec<KeyBinding> {
    raw.iter()
        .filter_map(|b| {
            let Some(pattern) = parse_key(&b.key) else {
                log::warn!(target: "ui::keybindings", "ignoring unknown key '{}'", b.key);
                return None;
            };
            let Some(action) = parse_action(&b.action) else {
                log::warn!(target: "ui::keybindings", "ignoring unknown action '{}'", b.action);
                return None;
            };
            Some(KeyBinding {
                pattern,
                action,
                description: b.description.clone(),
            })
        })
        .collect()
}
