//! Actions the presentation layer sends into the metronome.

use serde::{Deserialize, Serialize};

/// Metronome control actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetronomeAction {
    /// Set an absolute tempo (validated against the tempo range)
    SetTempo(u16),
    /// Nudge the tempo by a signed step, stopping at the range bounds
    AdjustTempo(i32),
    /// Play/pause button
    TogglePlay,
    Start,
    Stop,
    /// Mute button
    ToggleSound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Message for the status bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub level: StatusLevel,
    pub message: String,
}

impl StatusEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: StatusLevel::Info, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: StatusLevel::Warning, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: StatusLevel::Error, message: message.into() }
    }
}

/// Outcome of dispatching one action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchResult {
    /// State changed and the view should be redrawn
    pub changed: bool,
    pub status: Vec<StatusEvent>,
}

impl DispatchResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn changed() -> Self {
        Self { changed: true, status: Vec::new() }
    }

    pub fn with_status(mut self, event: StatusEvent) -> Self {
        self.status.push(event);
        self
    }
}
