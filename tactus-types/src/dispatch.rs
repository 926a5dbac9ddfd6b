//! Dispatch abstraction between the front end and the metronome core.

use crate::{DispatchResult, MetronomeAction};

/// Trait for dispatching actions to the metronome.
///
/// The binary talks to the core only through this trait, so front ends can be
/// swapped without touching scheduling code.
pub trait Dispatcher {
    /// Dispatch an action and return the result.
    fn dispatch(&mut self, action: &MetronomeAction) -> DispatchResult;
}
