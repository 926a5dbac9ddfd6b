//! # tactus-core
//!
//! Metronome engine: beat scheduling, pulse emission, action dispatch and
//! configuration, independent of any terminal or audio backend.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::time::Instant;
//! use tactus_core::{Config, Metronome, TimerQueue, SilentSynth, dispatch_action};
//! use tactus_types::MetronomeAction;
//!
//! let config = Config::load();
//! let mut metronome = Metronome::new(config.settings(), TimerQueue::new(Instant::now()), SilentSynth);
//!
//! dispatch_action(&MetronomeAction::TogglePlay, &mut metronome);
//! loop {
//!     metronome.advance(Instant::now());
//!     let view = metronome.view();
//!     // draw `view`
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`scheduler`]: `Metronome`: tempo, Stopped/Playing state machine, beat timer
//! - [`emitter`]: `PulseEmitter`: beat counter, flash state, click tones
//! - [`timer`]: `TimerService` seam and the `TimerQueue` deadline queue
//! - [`synth`]: `ToneSynth` seam
//! - [`dispatch`]: `dispatch_action()` with tempo validation at the boundary
//! - [`config`]: TOML configuration (embedded defaults + user override)

pub mod config;
pub mod dispatch;
pub mod emitter;
pub mod scheduler;
pub mod synth;
pub mod timer;

pub use config::Config;
pub use dispatch::{dispatch_action, LocalDispatcher};
pub use emitter::PulseEmitter;
pub use scheduler::{Metronome, MetronomeSettings};
pub use synth::{SilentSynth, ToneSynth};
pub use timer::{TimerFired, TimerHandle, TimerPurpose, TimerQueue, TimerService};
