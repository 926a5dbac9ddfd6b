use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tactus_types::TempoRange;

use crate::scheduler::MetronomeSettings;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    tempo: TempoConfig,
    #[serde(default)]
    sound: SoundConfig,
    #[serde(default)]
    display: DisplayConfig,
}

#[derive(Deserialize, Default)]
struct TempoConfig {
    default_bpm: Option<u16>,
    min_bpm: Option<u16>,
    max_bpm: Option<u16>,
    step: Option<u16>,
    coarse_step: Option<u16>,
}

#[derive(Deserialize, Default)]
struct SoundConfig {
    enabled: Option<bool>,
}

#[derive(Deserialize, Default)]
struct DisplayConfig {
    flash_ms: Option<u64>,
    frame_ms: Option<u64>,
}

/// Embedded defaults merged with the optional user config file.
pub struct Config {
    tempo: TempoConfig,
    sound: SoundConfig,
    display: DisplayConfig,
}

impl Config {
    /// Load defaults plus `~/.config/tactus/config.toml` if present.
    pub fn load() -> Self {
        Self::load_from(user_config_path().as_deref())
    }

    /// Load defaults plus the given override file. Missing, unreadable or
    /// malformed files are logged and ignored.
    pub fn load_from(path: Option<&Path>) -> Self {
        let mut base: ConfigFile = match toml::from_str(DEFAULT_CONFIG) {
            Ok(base) => base,
            Err(e) => {
                log::error!(target: "config", "embedded config.toml is invalid: {}", e);
                ConfigFile::default()
            }
        };

        if let Some(path) = path {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => {
                            merge_tempo(&mut base.tempo, user.tempo);
                            merge_sound(&mut base.sound, user.sound);
                            merge_display(&mut base.display, user.display);
                        }
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Config {
            tempo: base.tempo,
            sound: base.sound,
            display: base.display,
        }
    }

    pub fn tempo_range(&self) -> TempoRange {
        let fallback = TempoRange::default();
        TempoRange::new(
            self.tempo.min_bpm.unwrap_or(fallback.min()),
            self.tempo.max_bpm.unwrap_or(fallback.max()),
        )
    }

    /// Starting tempo, clamped into [`tempo_range`](Self::tempo_range).
    pub fn default_bpm(&self) -> u16 {
        self.tempo_range()
            .clamp(self.tempo.default_bpm.unwrap_or(tactus_types::DEFAULT_BPM))
    }

    /// Fine tempo step (at least 1).
    pub fn step(&self) -> u16 {
        self.tempo.step.unwrap_or(1).max(1)
    }

    /// Coarse tempo step (at least 1).
    pub fn coarse_step(&self) -> u16 {
        self.tempo.coarse_step.unwrap_or(10).max(1)
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound.enabled.unwrap_or(true)
    }

    /// Beat highlight duration (clamped to 10..1000 ms).
    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.display.flash_ms.unwrap_or(100).clamp(10, 1000))
    }

    /// Input poll / redraw interval (clamped to 1..100 ms).
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.display.frame_ms.unwrap_or(16).clamp(1, 100))
    }

    pub fn settings(&self) -> MetronomeSettings {
        MetronomeSettings {
            bpm: self.default_bpm(),
            range: self.tempo_range(),
            sound_enabled: self.sound_enabled(),
            flash_duration: self.flash_duration(),
        }
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tactus").join("config.toml"))
}

fn merge_tempo(base: &mut TempoConfig, user: TempoConfig) {
    if user.default_bpm.is_some() {
        base.default_bpm = user.default_bpm;
    }
    if user.min_bpm.is_some() {
        base.min_bpm = user.min_bpm;
    }
    if user.max_bpm.is_some() {
        base.max_bpm = user.max_bpm;
    }
    if user.step.is_some() {
        base.step = user.step;
    }
    if user.coarse_step.is_some() {
        base.coarse_step = user.coarse_step;
    }
}

fn merge_sound(base: &mut SoundConfig, user: SoundConfig) {
    if user.enabled.is_some() {
        base.enabled = user.enabled;
    }
}

fn merge_display(base: &mut DisplayConfig, user: DisplayConfig) {
    if user.flash_ms.is_some() {
        base.flash_ms = user.flash_ms;
    }
    if user.frame_ms.is_some() {
        base.frame_ms = user.frame_ms;
    }
}
